//! WMO weather interpretation codes

pub fn description(code: u32) -> &'static str {
    match code {
        0 => "Clear",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Fog",
        48 => "Rime fog",
        51 | 61 => "Light rain",
        53 | 63 => "Moderate rain",
        55 | 65 => "Heavy rain",
        56 | 57 | 66 | 67 => "Freezing rain",
        71 => "Light snow",
        73 => "Moderate snow",
        75 => "Heavy snow",
        77 => "Snow grains",
        80 | 81 => "Showers",
        82 => "Violent showers",
        85 | 86 => "Snow showers",
        95 => "Thunderstorm",
        96 | 99 => "Thunderstorm with hail",
        _ => "Unknown",
    }
}

/// Icon name for the bar, with day/night variants for clear skies
pub fn icon_name(code: u32, is_day: bool) -> &'static str {
    match code {
        0 if is_day => "sun",
        0 => "moon",
        1 if is_day => "cloudy",
        1 => "cloud-moon",
        2..=3 => "cloud",
        4..=57 => "cloud-drizzle",
        58..=67 => "cloud-rain",
        68..=77 => "cloud-snow",
        78..=82 => "cloud-rain",
        83..=86 => "cloud-snow",
        87..=99 => "cloud-lightning",
        _ if is_day => "sun",
        _ => "moon",
    }
}
