//! Auto-fit font sizes for the native name and unit lines.
//!
//! Every function here is pure: the same text and scale always yield the
//! same size.

/// Name sizes in surface pixels, indexed by tier: two characters or fewer,
/// three, four, five or more.
pub const NAME_SIZE_TIERS: [f32; 4] = [120.0, 100.0, 84.0, 68.0];

/// Base size of the unit line in surface pixels.
pub const UNIT_BASE_SIZE: f32 = 40.0;

/// Foreign-language lines relative to the line they accompany.
pub const FOREIGN_NAME_RATIO: f32 = 0.3;
pub const FOREIGN_UNIT_RATIO: f32 = 0.7;

/// Number of characters once all whitespace is removed.
pub fn visible_len(text: &str) -> usize {
    text.chars().filter(|c| !c.is_whitespace()).count()
}

/// Base name size for a character count, before scaling.
pub fn name_tier(char_count: usize) -> f32 {
    match char_count {
        0..=2 => NAME_SIZE_TIERS[0],
        3 => NAME_SIZE_TIERS[1],
        4 => NAME_SIZE_TIERS[2],
        _ => NAME_SIZE_TIERS[3],
    }
}

/// Font size of the name line, `scale` being `fontScale × nameScale`.
pub fn name_font_size(name: &str, scale: f32) -> f32 {
    name_tier(visible_len(name)) * scale
}

/// Font size of the unit line, `scale` being `fontScale × unitScale`.
pub fn unit_font_size(scale: f32) -> f32 {
    UNIT_BASE_SIZE * scale
}
