//! Multi-word names: particle handling and segment rendering.

use bmpm::prelude::*;

fn encode_name(name: &str, name_type: NameType) -> EncodedName {
    BeiderMorse::embedded()
        .unwrap()
        .encode_name(name, name_type, RuleType::Approx, None)
        .unwrap()
}

#[test]
fn test_single_word_name() {
    let name = encode_name("Schwarz", NameType::Generic);
    assert_eq!(name.segments().len(), 1);
    assert_eq!(name.to_string(), "(svarts|svorts|svYrts)");
}

#[test]
fn test_hyphenated_name_has_two_segments() {
    let name = encode_name("Kahn-Kohn", NameType::Ashkenazic);
    assert_eq!(name.to_string(), "(kan|kon)-(kon)");
}

#[test]
fn test_generic_elided_particle_keeps_both_readings() {
    let name = encode_name("D'Angelo", NameType::Generic);
    let segments = name.segments();
    assert_eq!(segments.len(), 2);
    assert!(segments[0].contains(&"angilo".to_string()), "{name}");
    assert!(segments[1].contains(&"dangilo".to_string()), "{name}");
}

#[test]
fn test_generic_leading_particle() {
    let parts = split_name("van der Berg", NameType::Generic);
    assert_eq!(parts.words(), ["der", "berg"]);
    assert_eq!(parts.attached(), Some("vanderberg"));

    let name = encode_name("van der Berg", NameType::Generic);
    assert_eq!(name.segments().len(), 3);
    assert!(name.keys().any(|key| key == "vandirbirk"), "{name}");
}

#[test]
fn test_sephardic_drops_particles() {
    let name = encode_name("de la Fuente", NameType::Sephardic);
    assert_eq!(name.segments().len(), 1);
    assert!(name.keys().any(|key| key == "vvinti"), "{name}");
}

#[test]
fn test_ashkenazic_drops_particles() {
    let with = encode_name("Ben Levi", NameType::Ashkenazic);
    let without = encode_name("Levi", NameType::Ashkenazic);
    assert_eq!(with, without);
}

#[test]
fn test_names_share_key() {
    let a = encode_name("Peter Moskowitz", NameType::Generic);
    let b = encode_name("Moskovitz", NameType::Generic);
    assert!(a.shares_key(&b));
    assert!(b.shares_key(&a));

    let c = encode_name("Kohn", NameType::Generic);
    assert!(!c.shares_key(&b));
}

#[test]
fn test_json_is_segment_list() {
    let name = encode_name("Kahn-Kohn", NameType::Ashkenazic);
    let json = serde_json::to_string(&name).unwrap();
    assert_eq!(json, r#"[["kan","kon"],["kon"]]"#);
}

#[test]
fn test_blank_name_is_rejected() {
    let result = BeiderMorse::embedded().unwrap().encode_name(
        " - ",
        NameType::Generic,
        RuleType::Approx,
        None,
    );
    assert!(matches!(result, Err(Error::EmptyWord)));
}
