//! Display lookups for card lists
//!
//! Color names follow the Material palette used by the web front end.

use shared::models::{Card, Rarity, StockState};

/// Color for categories not in the table
pub const FALLBACK_COLOR: &str = "blue-grey";

pub fn rarity_color(rarity: Rarity) -> &'static str {
    match rarity {
        Rarity::Common => "grey",
        Rarity::Uncommon => "blue",
        Rarity::Rare => "purple",
        Rarity::UltraRare => "amber-darken-2",
        Rarity::SecretRare => "red-darken-2",
    }
}

/// Energy type color, case-insensitive
pub fn category_color(category: &str) -> &'static str {
    match category.trim().to_ascii_lowercase().as_str() {
        "fire" => "red",
        "water" => "blue",
        "grass" => "green",
        "electric" | "lightning" => "amber-darken-2",
        "psychic" => "purple",
        "fighting" => "brown",
        "dark" | "darkness" => "grey-darken-3",
        "metal" => "grey",
        "fairy" => "pink",
        "dragon" => "deep-orange",
        "colorless" => "grey-lighten-1",
        _ => FALLBACK_COLOR,
    }
}

pub fn card_rarity_color(card: &Card) -> &'static str {
    card.rarity.map(rarity_color).unwrap_or(FALLBACK_COLOR)
}

pub fn card_category_color(card: &Card) -> &'static str {
    card.category.as_deref().map(category_color).unwrap_or(FALLBACK_COLOR)
}

pub fn stock_label(card: &Card) -> &'static str {
    match card.stock_state() {
        StockState::Available => "Available",
        StockState::LowStock => "Last copy",
        StockState::OutOfStock => "Out of stock",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_colors() {
        assert_eq!(category_color("Fire"), "red");
        assert_eq!(category_color("psychic"), "purple");
        assert_eq!(category_color("Colorless"), "grey-lighten-1");
        assert_eq!(category_color("Sound"), FALLBACK_COLOR);
    }

    #[test]
    fn test_card_colors_fall_back() {
        let card = Card::new("a", "Porygon", 1);
        assert_eq!(card_rarity_color(&card), FALLBACK_COLOR);
        assert_eq!(card_category_color(&card), FALLBACK_COLOR);

        let card = Card {
            rarity: Some(Rarity::SecretRare),
            category: Some("Dragon".into()),
            ..card
        };
        assert_eq!(card_rarity_color(&card), "red-darken-2");
        assert_eq!(card_category_color(&card), "deep-orange");
    }

    #[test]
    fn test_stock_label() {
        assert_eq!(stock_label(&Card::new("a", "Eevee", 1)), "Last copy");
        assert_eq!(stock_label(&Card::new("a", "Eevee", 1).with_checked_out(1)), "Out of stock");
        assert_eq!(stock_label(&Card::new("a", "Eevee", 4)), "Available");
    }
}
