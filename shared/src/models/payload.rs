//! Create/update payloads for cards

use super::card::{Card, Rarity};
use crate::error::FieldErrors;
use std::path::Path;

/// Local image bytes selected for upload, alive only until submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingImage {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl PendingImage {
    /// Content type is guessed from the file extension
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = mime_guess::from_path(&file_name)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        Self {
            file_name,
            content_type,
            bytes,
        }
    }

    /// Read an image from disk
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "card_image".to_string());
        Ok(Self::new(file_name, bytes))
    }
}

/// What to do with the card image on submit
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ImageChange {
    /// Keep the existing image (update) or send none (create)
    #[default]
    Keep,
    /// Upload a new image
    Upload(PendingImage),
}

/// Editable card fields plus an optional image upload
#[derive(Debug, Clone, PartialEq)]
pub struct CardPayload {
    pub name: String,
    pub subject_name: Option<String>,
    pub category: Option<String>,
    pub rarity: Option<Rarity>,
    pub length: Option<String>,
    pub weight: Option<String>,
    pub card_number: Option<String>,
    pub description: Option<String>,
    pub total_quantity: u32,
    pub image: ImageChange,
}

impl CardPayload {
    pub fn new(name: impl Into<String>, total_quantity: u32) -> Self {
        Self {
            name: name.into(),
            subject_name: None,
            category: None,
            rarity: None,
            length: None,
            weight: None,
            card_number: None,
            description: None,
            total_quantity,
            image: ImageChange::Keep,
        }
    }

    /// Edit payload pre-filled from an existing card, keeping its image
    pub fn from_card(card: &Card) -> Self {
        Self {
            name: card.name.clone(),
            subject_name: card.subject_name.clone(),
            category: card.category.clone(),
            rarity: card.rarity,
            length: card.length.clone(),
            weight: card.weight.clone(),
            card_number: card.card_number.clone(),
            description: card.description.clone(),
            total_quantity: card.total_quantity,
            image: ImageChange::Keep,
        }
    }

    pub fn with_image(mut self, image: PendingImage) -> Self {
        self.image = ImageChange::Upload(image);
        self
    }

    /// Local checks only; everything else is the server's call
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if self.name.trim().is_empty() {
            errors.insert("name".into(), "Name is required".into());
        }
        if self.total_quantity == 0 {
            errors.insert(
                "total_quantity".into(),
                "Total quantity must be at least 1".into(),
            );
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Text form fields in wire naming
    ///
    /// Every editable field is sent so an update can clear one; a cleared
    /// field goes out as "". Only the image part is optional.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let text = |value: &Option<String>| value.clone().unwrap_or_default();
        vec![
            ("name", self.name.clone()),
            ("pokemon_name", text(&self.subject_name)),
            ("energy_type", text(&self.category)),
            (
                "card_rarity",
                self.rarity.map(|r| r.as_str().to_string()).unwrap_or_default(),
            ),
            ("length", text(&self.length)),
            ("weight", text(&self.weight)),
            ("card_number", text(&self.card_number)),
            ("description", text(&self.description)),
            ("total_quantity", self.total_quantity.to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_blank_name_and_zero_quantity() {
        let errors = CardPayload::new("  ", 0).validate().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.contains_key("name"));
        assert!(errors.contains_key("total_quantity"));

        assert!(CardPayload::new("Charizard", 1).validate().is_ok());
    }

    #[test]
    fn test_from_card_keeps_image() {
        let mut card = Card::new("c1", "Charizard", 2);
        card.card_image = Some("https://cdn.example/c1.png".into());
        card.rarity = Some(Rarity::Rare);
        let payload = CardPayload::from_card(&card);
        assert_eq!(payload.image, ImageChange::Keep);
        assert_eq!(payload.total_quantity, 2);
        assert_eq!(payload.rarity, Some(Rarity::Rare));
    }

    #[test]
    fn test_form_fields_use_wire_names() {
        let mut payload = CardPayload::new("Blaze", 3);
        payload.subject_name = Some("Charizard".into());
        payload.rarity = Some(Rarity::UltraRare);
        let fields = payload.form_fields();
        assert!(fields.contains(&("pokemon_name", "Charizard".to_string())));
        assert!(fields.contains(&("card_rarity", "Ultra Rare".to_string())));
        assert!(fields.contains(&("total_quantity", "3".to_string())));
        assert!(fields.contains(&("weight", String::new())));
    }

    #[test]
    fn test_cleared_field_is_sent_blank() {
        let mut card = Card::new("c1", "Blaze", 2);
        card.description = Some("old text".into());
        card.rarity = Some(Rarity::Rare);

        let mut payload = CardPayload::from_card(&card);
        payload.description = None;
        payload.rarity = None;
        let fields = payload.form_fields();
        assert!(fields.contains(&("description", String::new())));
        assert!(fields.contains(&("card_rarity", String::new())));
        assert_eq!(fields.len(), 9);
    }

    #[test]
    fn test_pending_image_guesses_content_type() {
        let image = PendingImage::new("front.png", vec![0x89, 0x50]);
        assert_eq!(image.content_type, "image/png");
        let image = PendingImage::new("blob", vec![]);
        assert_eq!(image.content_type, "application/octet-stream");
    }
}
