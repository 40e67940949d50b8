//! Ready-made custom processor scripts

/// A named example script offered when creating a custom processor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    /// Short key used on the command line
    pub key: &'static str,
    /// Suggested processor name
    pub name: &'static str,
    pub script: &'static str,
}

pub const PRESETS: &[Preset] = &[
    Preset {
        key: "uppercase",
        name: "Uppercase Converter",
        script: "return input.toUpperCase();",
    },
    Preset {
        key: "lowercase",
        name: "Lowercase Converter",
        script: "return input.toLowerCase();",
    },
    Preset {
        key: "reverse",
        name: "Text Reverser",
        script: "return input.split('').reverse().join('');",
    },
    Preset {
        key: "word-count",
        name: "Word Counter",
        script: "function process(input) {\n  return 'Word count: ' + input.split(/\\s+/).filter(word => word.length > 0).length;\n}",
    },
    Preset {
        key: "strip-whitespace",
        name: "Whitespace Remover",
        script: "return input.replace(/\\s+/g, '');",
    },
    Preset {
        key: "number-lines",
        name: "Line Numberer",
        script: "function process(input) {\n  return input.split('\\n').map(function (line, index) {\n    return (index + 1) + '. ' + line;\n  }).join('\\n');\n}",
    },
];

/// Look a preset up by its key
pub fn find(key: &str) -> Option<&'static Preset> {
    PRESETS.iter().find(|preset| preset.key == key)
}
