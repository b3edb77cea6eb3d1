//! Canonical product-name mapping.
//!
//! Imported volume types arrive as free text with vendor-specific labels. This
//! module normalizes them to a fixed small vocabulary so that grouping, sorting,
//! and export all agree on product identity. The mapping is many-to-one and total:
//! unknown labels pass through unchanged.

/// The canonical product vocabulary, in display order.
pub const KNOWN_PRODUCTS: &[&str] = &[
    "Email",
    "Mobile App Volume",
    "SMS/MMS",
    "SMS",
    "MMS",
    "Open Channel",
    "Architect",
];

/// Map a free-text volume type to its canonical product name.
///
/// Known aliases are folded into the canonical vocabulary; anything else is
/// returned unchanged so new product lines still group consistently.
pub fn canonicalize(name: &str) -> &str {
    match name.trim() {
        "Cordial Email" | "Email" => "Email",
        "Mobile App" | "Mobile App Volume" => "Mobile App Volume",
        "SMS/MMS" => "SMS/MMS",
        "SMS" => "SMS",
        "MMS" => "MMS",
        "Open Channel" => "Open Channel",
        "Architect" => "Architect",
        other => other,
    }
}

/// Whether two product labels refer to the same canonical product.
pub fn same_product(a: &str, b: &str) -> bool {
    a == b || canonicalize(a) == canonicalize(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_aliases() {
        assert_eq!(canonicalize("Cordial Email"), "Email");
        assert_eq!(canonicalize("Email"), "Email");
        assert_eq!(canonicalize("Mobile App"), "Mobile App Volume");
        assert_eq!(canonicalize("Mobile App Volume"), "Mobile App Volume");
        assert_eq!(canonicalize("SMS/MMS"), "SMS/MMS");
        assert_eq!(canonicalize("SMS"), "SMS");
        assert_eq!(canonicalize("MMS"), "MMS");
        assert_eq!(canonicalize("Open Channel"), "Open Channel");
        assert_eq!(canonicalize("Architect"), "Architect");
    }

    #[test]
    fn test_unknown_passthrough() {
        assert_eq!(canonicalize("Push Notifications"), "Push Notifications");
        assert_eq!(canonicalize("  SMS  "), "SMS");
    }

    #[test]
    fn test_same_product_across_aliases() {
        assert!(same_product("Cordial Email", "Email"));
        assert!(same_product("Mobile App", "Mobile App Volume"));
        assert!(!same_product("SMS", "MMS"));
    }
}
