// src/core/style.rs — Writing style presets

/// Built-in voice presets selectable by key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StylePreset {
    LifeRational,
    WarmHealing,
    Novelistic,
}

impl StylePreset {
    pub const DEFAULT: StylePreset = StylePreset::LifeRational;

    pub const ALL: [StylePreset; 3] = [
        StylePreset::LifeRational,
        StylePreset::WarmHealing,
        StylePreset::Novelistic,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            StylePreset::LifeRational => "life-rational",
            StylePreset::WarmHealing => "warm-healing",
            StylePreset::Novelistic => "novelistic",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.key() == key)
    }

    pub fn prompt(&self) -> &'static str {
        match self {
            StylePreset::LifeRational => LIFE_RATIONAL,
            StylePreset::WarmHealing => WARM_HEALING,
            StylePreset::Novelistic => NOVELISTIC,
        }
    }
}

/// Map a spec's style key to `(effective_key, preset text)`.
///
/// An empty key selects [`StylePreset::DEFAULT`]. Unknown keys are accepted
/// and yield no style text.
pub fn resolve_style(key: &str) -> (&str, Option<&'static str>) {
    let effective = if key.is_empty() {
        StylePreset::DEFAULT.key()
    } else {
        key
    };
    match StylePreset::from_key(effective) {
        Some(preset) => (effective, Some(preset.prompt())),
        None => {
            tracing::warn!(style = effective, "unknown style preset, continuing without style text");
            (effective, None)
        }
    }
}

const LIFE_RATIONAL: &str = "你是一名内容写作者，面向没有专业背景的普通读者。

写作要求：
- 风格：生活化、理性、克制
- 语气：冷静、解释型，不煽动情绪
- 不使用营销号语言（如“震惊”“你一定不知道”）
- 不居高临下，不对读者进行道德评判
- 用日常生活场景引出问题
- 用简单的科学模型或研究结论进行解释
- 避免过多专业术语，如必须出现请顺带解释

文章结构建议：
1. 一个真实生活场景或普遍困惑
2. 人们常见的直觉理解
3. 科学上的解释或研究发现
4. 一个温和、开放的收束结论

目标：
让读者读完后觉得“原来是这样”，而不是“我被教育了”。";

const WARM_HEALING: &str = "你是一名温和的内容写作者，擅长用科学解释人的情绪和行为。

写作要求：
- 风格：温和、治愈、有同理心
- 语气：像一个理解人的朋友，而不是专家或老师
- 允许情绪表达，但不过度煽情
- 不指责、不批评、不下“你应该”的结论
- 科学内容作为解释工具，而不是说服工具

文章结构建议：
1. 描述一种常见的情绪或困扰
2. 明确告诉读者：这种状态并不罕见
3. 用心理学或行为科学解释为什么会这样
4. 给出一个宽松、非强制的理解视角

目标：
让读者读完后感觉“被理解”，而不是“被分析”。";

const NOVELISTIC: &str = "你是一名内容写作者，使用“轻小说式叙事”来解释现象或原理。

写作方式：
- 以一个非常日常的生活场景开头
- 使用第三人称或模糊第一人称
- 场景真实、克制，不追求戏剧冲突
- 不写完整故事，只写一个生活切片
- 人物不需要名字和详细背景

解释要求：
- 小说只是引子，核心目的是解释原理
- 在中段自然引入心理学 / 认知科学解释
- 避免学术语言，用生活化比喻说明机制
- 不下结论式判断，不进行价值说教

文章目标：
让读者在“读故事”的过程中，理解一个科学概念。";
