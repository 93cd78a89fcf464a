//! Built-in theme presets
//!
//! All presets share typography, spacing and animation timing; only the
//! palettes and display metadata differ.

use super::{
    Animations, ColorPalette, Durations, Easings, Spacing, ThemeBundle, ThemeCategory, ThemeId,
    ThemeMetadata, ThemePreview, Typography,
};

const TYPOGRAPHY: Typography = Typography {
    font_mono: "Geist Mono, monospace",
    font_sans: "'Segoe UI', Tahoma, Geneva, Verdana, sans-serif",
};

const SPACING: Spacing = Spacing {
    xs: "0.25rem",
    sm: "0.5rem",
    md: "1rem",
    lg: "1.5rem",
    xl: "2rem",
};

const ANIMATIONS: Animations = Animations {
    duration: Durations {
        fast: "0.15s",
        normal: "0.3s",
        slow: "0.5s",
    },
    easing: Easings {
        ease_in_out: "ease-in-out",
        ease_out: "ease-out",
        spring: "cubic-bezier(0.68, -0.55, 0.265, 1.55)",
    },
};

const HYPR_DARK: ColorPalette = ColorPalette {
    background: "rgb(15 15 15)",
    text: "rgb(255 255 255)",
    text_muted: "rgb(156 163 175)",
    icon: "rgb(156 163 175)",
    primary: "rgb(59 130 246)",
    primary_border: "rgb(37 99 235)",
    button_border: "rgb(55 65 81)",
};
const HYPR_LIGHT: ColorPalette = ColorPalette {
    background: "rgb(255 255 255)",
    text: "rgb(15 15 15)",
    text_muted: "rgb(107 114 128)",
    icon: "rgb(107 114 128)",
    primary: "rgb(59 130 246)",
    primary_border: "rgb(37 99 235)",
    button_border: "rgb(209 213 219)",
};
const NORD_DARK: ColorPalette = ColorPalette {
    background: "rgb(46 52 64)",
    text: "rgb(236 239 244)",
    text_muted: "rgb(129 161 193)",
    icon: "rgb(129 161 193)",
    primary: "rgb(136 192 208)",
    primary_border: "rgb(94 129 172)",
    button_border: "rgb(59 66 82)",
};
const NORD_LIGHT: ColorPalette = ColorPalette {
    background: "rgb(236 239 244)",
    text: "rgb(46 52 64)",
    text_muted: "rgb(76 86 106)",
    icon: "rgb(76 86 106)",
    primary: "rgb(94 129 172)",
    primary_border: "rgb(136 192 208)",
    button_border: "rgb(216 222 233)",
};
const CATPPUCCIN_MOCHA: ColorPalette = ColorPalette {
    background: "rgb(30 30 46)",
    text: "rgb(205 214 244)",
    text_muted: "rgb(166 173 200)",
    icon: "rgb(166 173 200)",
    primary: "rgb(137 180 250)",
    primary_border: "rgb(116 199 236)",
    button_border: "rgb(49 50 68)",
};
const CATPPUCCIN_LATTE: ColorPalette = ColorPalette {
    background: "rgb(239 241 245)",
    text: "rgb(76 79 105)",
    text_muted: "rgb(108 111 133)",
    icon: "rgb(108 111 133)",
    primary: "rgb(30 102 245)",
    primary_border: "rgb(4 165 229)",
    button_border: "rgb(220 224 232)",
};
const DRACULA: ColorPalette = ColorPalette {
    background: "rgb(40 42 54)",
    text: "rgb(248 248 242)",
    text_muted: "rgb(98 114 164)",
    icon: "rgb(98 114 164)",
    primary: "rgb(139 233 253)",
    primary_border: "rgb(189 147 249)",
    button_border: "rgb(68 71 90)",
};
const TOKYO_NIGHT: ColorPalette = ColorPalette {
    background: "rgb(26 27 38)",
    text: "rgb(169 177 214)",
    text_muted: "rgb(86 95 137)",
    icon: "rgb(86 95 137)",
    primary: "rgb(125 207 255)",
    primary_border: "rgb(187 154 247)",
    button_border: "rgb(41 46 66)",
};
const GRUVBOX_DARK: ColorPalette = ColorPalette {
    background: "rgb(40 40 40)",
    text: "rgb(235 219 178)",
    text_muted: "rgb(168 153 132)",
    icon: "rgb(168 153 132)",
    primary: "rgb(131 165 152)",
    primary_border: "rgb(184 187 38)",
    button_border: "rgb(60 56 54)",
};
const GRUVBOX_LIGHT: ColorPalette = ColorPalette {
    background: "rgb(251 241 199)",
    text: "rgb(60 56 54)",
    text_muted: "rgb(102 92 84)",
    icon: "rgb(102 92 84)",
    primary: "rgb(121 116 14)",
    primary_border: "rgb(175 58 3)",
    button_border: "rgb(213 196 161)",
};
const ONE_DARK: ColorPalette = ColorPalette {
    background: "rgb(40 44 52)",
    text: "rgb(171 178 191)",
    text_muted: "rgb(92 99 112)",
    icon: "rgb(92 99 112)",
    primary: "rgb(97 175 239)",
    primary_border: "rgb(198 120 221)",
    button_border: "rgb(54 59 69)",
};
const SOLARIZED_DARK: ColorPalette = ColorPalette {
    background: "rgb(0 43 54)",
    text: "rgb(131 148 150)",
    text_muted: "rgb(88 110 117)",
    icon: "rgb(88 110 117)",
    primary: "rgb(38 139 210)",
    primary_border: "rgb(42 161 152)",
    button_border: "rgb(7 54 66)",
};
const SOLARIZED_LIGHT: ColorPalette = ColorPalette {
    background: "rgb(253 246 227)",
    text: "rgb(101 123 131)",
    text_muted: "rgb(147 161 161)",
    icon: "rgb(147 161 161)",
    primary: "rgb(38 139 210)",
    primary_border: "rgb(42 161 152)",
    button_border: "rgb(238 232 213)",
};
const MATERIAL_DARK: ColorPalette = ColorPalette {
    background: "rgb(33 33 33)",
    text: "rgb(255 255 255)",
    text_muted: "rgb(158 158 158)",
    icon: "rgb(158 158 158)",
    primary: "rgb(33 150 243)",
    primary_border: "rgb(3 169 244)",
    button_border: "rgb(66 66 66)",
};
const MATERIAL_LIGHT: ColorPalette = ColorPalette {
    background: "rgb(250 250 250)",
    text: "rgb(33 33 33)",
    text_muted: "rgb(117 117 117)",
    icon: "rgb(117 117 117)",
    primary: "rgb(33 150 243)",
    primary_border: "rgb(3 169 244)",
    button_border: "rgb(224 224 224)",
};
const CYBERPUNK: ColorPalette = ColorPalette {
    background: "rgb(13 13 13)",
    text: "rgb(0 255 255)",
    text_muted: "rgb(255 20 147)",
    icon: "rgb(255 20 147)",
    primary: "rgb(57 255 20)",
    primary_border: "rgb(255 215 0)",
    button_border: "rgb(75 0 130)",
};
const FOREST: ColorPalette = ColorPalette {
    background: "rgb(22 27 34)",
    text: "rgb(201 209 217)",
    text_muted: "rgb(125 149 117)",
    icon: "rgb(125 149 117)",
    primary: "rgb(64 160 43)",
    primary_border: "rgb(87 171 90)",
    button_border: "rgb(33 41 46)",
};
const OCEAN: ColorPalette = ColorPalette {
    background: "rgb(15 23 42)",
    text: "rgb(226 232 240)",
    text_muted: "rgb(100 116 139)",
    icon: "rgb(100 116 139)",
    primary: "rgb(14 165 233)",
    primary_border: "rgb(56 189 248)",
    button_border: "rgb(30 41 59)",
};
const SUNSET: ColorPalette = ColorPalette {
    background: "rgb(45 21 76)",
    text: "rgb(255 237 213)",
    text_muted: "rgb(255 183 77)",
    icon: "rgb(255 183 77)",
    primary: "rgb(255 107 107)",
    primary_border: "rgb(255 154 0)",
    button_border: "rgb(69 39 160)",
};
const AURORA: ColorPalette = ColorPalette {
    background: "rgb(17 24 39)",
    text: "rgb(243 244 246)",
    text_muted: "rgb(156 163 175)",
    icon: "rgb(156 163 175)",
    primary: "rgb(34 197 94)",
    primary_border: "rgb(168 85 247)",
    button_border: "rgb(31 41 55)",
};

struct ThemeEntry {
    id: ThemeId,
    colors: ColorPalette,
    name: &'static str,
    description: &'static str,
    author: &'static str,
    category: ThemeCategory,
    tags: &'static [&'static str],
}

// Registration order; indexed by `ThemeId as usize`.
static THEMES: [ThemeEntry; 20] = [
    ThemeEntry {
        id: ThemeId::HyprDark,
        colors: HYPR_DARK,
        name: "HyprGlaze Dark",
        description: "Default dark theme with a clean, modern look",
        author: "HyprGlaze Team",
        category: ThemeCategory::Dark,
        tags: &["default", "dark", "modern"],
    },
    ThemeEntry {
        id: ThemeId::HyprLight,
        colors: HYPR_LIGHT,
        name: "HyprGlaze Light",
        description: "Fresh light theme for daytime use",
        author: "HyprGlaze Team",
        category: ThemeCategory::Light,
        tags: &["default", "light", "fresh"],
    },
    ThemeEntry {
        id: ThemeId::NordDark,
        colors: NORD_DARK,
        name: "Nord Dark",
        description: "Cool arctic dark theme",
        author: "Arctic Ice Studio",
        category: ThemeCategory::Dark,
        tags: &["nord", "dark", "cool", "nordic"],
    },
    ThemeEntry {
        id: ThemeId::NordLight,
        colors: NORD_LIGHT,
        name: "Nord Light",
        description: "Light variant of the Nord palette",
        author: "Arctic Ice Studio",
        category: ThemeCategory::Light,
        tags: &["nord", "light", "cool", "nordic"],
    },
    ThemeEntry {
        id: ThemeId::CatppuccinMocha,
        colors: CATPPUCCIN_MOCHA,
        name: "Catppuccin Mocha",
        description: "Warm, cozy dark theme, rich like a mocha",
        author: "Catppuccin",
        category: ThemeCategory::Dark,
        tags: &["catppuccin", "dark", "warm", "cozy"],
    },
    ThemeEntry {
        id: ThemeId::CatppuccinLatte,
        colors: CATPPUCCIN_LATTE,
        name: "Catppuccin Latte",
        description: "Gentle light theme, soft like a latte",
        author: "Catppuccin",
        category: ThemeCategory::Light,
        tags: &["catppuccin", "light", "gentle", "soft"],
    },
    ThemeEntry {
        id: ThemeId::Dracula,
        colors: DRACULA,
        name: "Dracula",
        description: "Classic vampire theme, mysterious and elegant",
        author: "Dracula Theme",
        category: ThemeCategory::Dark,
        tags: &["dracula", "dark", "classic", "mysterious"],
    },
    ThemeEntry {
        id: ThemeId::TokyoNight,
        colors: TOKYO_NIGHT,
        name: "Tokyo Night",
        description: "Deep blue and purple inspired by Tokyo at night",
        author: "Tokyo Night",
        category: ThemeCategory::Dark,
        tags: &["tokyo night", "dark", "blue-purple", "modern"],
    },
    ThemeEntry {
        id: ThemeId::GruvboxDark,
        colors: GRUVBOX_DARK,
        name: "Gruvbox Dark",
        description: "Warm retro dark theme, easy on the eyes",
        author: "Gruvbox",
        category: ThemeCategory::Dark,
        tags: &["gruvbox", "dark", "warm", "retro"],
    },
    ThemeEntry {
        id: ThemeId::GruvboxLight,
        colors: GRUVBOX_LIGHT,
        name: "Gruvbox Light",
        description: "Warm and bright light variant of Gruvbox",
        author: "Gruvbox",
        category: ThemeCategory::Light,
        tags: &["gruvbox", "light", "warm", "bright"],
    },
    ThemeEntry {
        id: ThemeId::OneDark,
        colors: ONE_DARK,
        name: "One Dark",
        description: "The classic dark theme of the Atom editor",
        author: "Atom",
        category: ThemeCategory::Dark,
        tags: &["one dark", "dark", "classic", "editor"],
    },
    ThemeEntry {
        id: ThemeId::SolarizedDark,
        colors: SOLARIZED_DARK,
        name: "Solarized Dark",
        description: "Classic Solarized dark palette designed for readability",
        author: "Ethan Schoonover",
        category: ThemeCategory::Dark,
        tags: &["solarized", "dark", "readable", "classic"],
    },
    ThemeEntry {
        id: ThemeId::SolarizedLight,
        colors: SOLARIZED_LIGHT,
        name: "Solarized Light",
        description: "Light variant of the Solarized palette",
        author: "Ethan Schoonover",
        category: ThemeCategory::Light,
        tags: &["solarized", "light", "readable", "classic"],
    },
    ThemeEntry {
        id: ThemeId::MaterialDark,
        colors: MATERIAL_DARK,
        name: "Material Dark",
        description: "Google Material Design dark theme",
        author: "Google",
        category: ThemeCategory::Dark,
        tags: &["material", "dark", "google", "modern"],
    },
    ThemeEntry {
        id: ThemeId::MaterialLight,
        colors: MATERIAL_LIGHT,
        name: "Material Light",
        description: "Google Material Design light theme",
        author: "Google",
        category: ThemeCategory::Light,
        tags: &["material", "light", "google", "modern"],
    },
    ThemeEntry {
        id: ThemeId::Cyberpunk,
        colors: CYBERPUNK,
        name: "Cyberpunk",
        description: "Futuristic neon colors",
        author: "HyprGlaze Team",
        category: ThemeCategory::Dark,
        tags: &["cyberpunk", "dark", "neon", "sci-fi"],
    },
    ThemeEntry {
        id: ThemeId::Forest,
        colors: FOREST,
        name: "Forest",
        description: "Natural greens that are easy on the eyes",
        author: "HyprGlaze Team",
        category: ThemeCategory::Dark,
        tags: &["forest", "dark", "green", "nature"],
    },
    ThemeEntry {
        id: ThemeId::Ocean,
        colors: OCEAN,
        name: "Ocean",
        description: "Calm deep-sea blues",
        author: "HyprGlaze Team",
        category: ThemeCategory::Dark,
        tags: &["ocean", "dark", "blue", "calm"],
    },
    ThemeEntry {
        id: ThemeId::Sunset,
        colors: SUNSET,
        name: "Sunset",
        description: "Warm, romantic sunset colors",
        author: "HyprGlaze Team",
        category: ThemeCategory::Dark,
        tags: &["sunset", "dark", "warm", "romantic"],
    },
    ThemeEntry {
        id: ThemeId::Aurora,
        colors: AURORA,
        name: "Aurora",
        description: "Mysterious aurora greens and purples",
        author: "HyprGlaze Team",
        category: ThemeCategory::Dark,
        tags: &["aurora", "dark", "mysterious", "green-purple"],
    },
];

static IDS: [ThemeId; 20] = [
    ThemeId::HyprDark,
    ThemeId::HyprLight,
    ThemeId::NordDark,
    ThemeId::NordLight,
    ThemeId::CatppuccinMocha,
    ThemeId::CatppuccinLatte,
    ThemeId::Dracula,
    ThemeId::TokyoNight,
    ThemeId::GruvboxDark,
    ThemeId::GruvboxLight,
    ThemeId::OneDark,
    ThemeId::SolarizedDark,
    ThemeId::SolarizedLight,
    ThemeId::MaterialDark,
    ThemeId::MaterialLight,
    ThemeId::Cyberpunk,
    ThemeId::Forest,
    ThemeId::Ocean,
    ThemeId::Sunset,
    ThemeId::Aurora,
];

fn entry(id: ThemeId) -> &'static ThemeEntry {
    &THEMES[id as usize]
}

/// Every preset id in registration order
pub fn all() -> &'static [ThemeId] {
    &IDS
}

/// Visual bundle of a preset
pub fn resolve(id: ThemeId) -> ThemeBundle {
    ThemeBundle {
        colors: entry(id).colors,
        typography: TYPOGRAPHY,
        spacing: SPACING,
        animations: ANIMATIONS,
    }
}

pub fn preview(id: ThemeId) -> ThemePreview {
    let colors = &entry(id).colors;
    ThemePreview {
        background: colors.background,
        primary: colors.primary,
        text: colors.text,
    }
}

pub fn metadata(id: ThemeId) -> ThemeMetadata {
    let e = entry(id);
    ThemeMetadata {
        id: e.id,
        name: e.name,
        description: e.description,
        author: e.author,
        category: e.category,
        tags: e.tags,
        preview: preview(id),
    }
}

/// Preset ids of one category, in registration order
pub fn by_category(category: ThemeCategory) -> Vec<ThemeId> {
    IDS.iter()
        .copied()
        .filter(|id| entry(*id).category == category)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_preset_has_matching_metadata() {
        for id in all() {
            assert_eq!(metadata(*id).id, *id);
        }
    }

    #[test]
    fn every_bundle_has_all_colors() {
        for id in all() {
            let c = resolve(*id).colors;
            for value in [
                c.background,
                c.text,
                c.text_muted,
                c.icon,
                c.primary,
                c.primary_border,
                c.button_border,
            ] {
                assert!(!value.is_empty(), "{} has an empty color", id);
            }
        }
    }

    #[test]
    fn ids_are_unique_and_ordered() {
        let unique: HashSet<_> = all().iter().collect();
        assert_eq!(unique.len(), 20);
        assert_eq!(all()[0], ThemeId::HyprDark);
        assert_eq!(all()[19], ThemeId::Aurora);
    }

    #[test]
    fn categories_partition_the_registry() {
        let dark = by_category(ThemeCategory::Dark);
        let light = by_category(ThemeCategory::Light);
        assert_eq!(dark.len() + light.len(), all().len());
        assert!(light.contains(&ThemeId::NordLight));
        assert!(dark.contains(&ThemeId::Cyberpunk));
    }

    #[test]
    fn preview_uses_palette_colors() {
        let p = preview(ThemeId::Dracula);
        assert_eq!(p.background, "rgb(40 42 54)");
        assert_eq!(p.primary, "rgb(139 233 253)");
        assert_eq!(p.text, "rgb(248 248 242)");
    }
}
