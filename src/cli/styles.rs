// src/cli/styles.rs — List style presets

use crate::core::style::StylePreset;

pub fn run_styles() -> anyhow::Result<()> {
    for preset in StylePreset::ALL {
        let marker = if preset == StylePreset::DEFAULT {
            " (default)"
        } else {
            ""
        };
        println!("{}{}", preset.key(), marker);
        if let Some(line) = preset
            .prompt()
            .lines()
            .find(|l| l.trim_start().starts_with("- 风格"))
        {
            println!("    {}", line.trim_start_matches(['-', ' ']));
        }
    }
    Ok(())
}
