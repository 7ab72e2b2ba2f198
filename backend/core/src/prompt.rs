//! Fixed instructions sent alongside every image.

/// Default instruction: identify a photographed Pokémon trading card.
pub const CARD_SORTING_PROMPT: &str = "You are a Pokémon card sorting assistant.
For each Pokémon card image, identify and return the following:
- Card Name
- Card Number & Set (e.g., 4/102 from Base Set, or SV01/SV162 from Scarlet & Violet)
- Set Symbol (describe or name if identifiable)
- Rarity (Common, Uncommon, Rare, Holo Rare, Reverse Holo, EX, GX, V, VSTAR, Full Art, Secret Rare, etc.)
- Card Type (e.g., Pokémon, Trainer, Energy, and evolution stage if applicable)
- Condition (if visible: Mint, Near Mint, Played, Damaged)

Make sure to double check your answer before returning it.
If any detail is unclear or missing from the image, label it as \"Unclear\" and explain why.";

/// General-purpose scene description, used by the local model path.
pub const GENERAL_DESCRIPTION_PROMPT: &str = "Analyze this image and provide a detailed description including:
1. Main subject and its characteristics
2. Background elements and setting
3. Colors and lighting
4. Overall composition and mood
5. Any notable details or features";

/// Named prompt presets selectable from configuration.
pub fn preset(name: &str) -> Option<&'static str> {
    match name {
        "card-sorting" => Some(CARD_SORTING_PROMPT),
        "describe" => Some(GENERAL_DESCRIPTION_PROMPT),
        _ => None,
    }
}
