/// Table de remplacement : 0↔5, 1↔9, 2↔8, 3↔7, 4↔6.
pub const REPLACEMENT_TABLE: [u8; 10] = [5, 9, 8, 7, 6, 0, 4, 3, 2, 1];

/// Partenaire de `digit` dans la table. Hors 0-9, renvoie `digit` inchangé.
pub fn replacement_of(digit: u8) -> u8 {
    REPLACEMENT_TABLE
        .get(digit as usize)
        .copied()
        .unwrap_or(digit)
}
