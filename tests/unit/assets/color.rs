use super::*;

#[test]
fn parses_hex_forms() {
    assert_eq!(parse_css_color("#ffffff").unwrap(), Rgba8::WHITE);
    assert_eq!(parse_css_color("#F00").unwrap(), Rgba8::opaque(255, 0, 0));
    assert_eq!(
        parse_css_color("#0000ff80").unwrap(),
        Rgba8::new(0, 0, 255, 128)
    );
    assert!(parse_css_color("#12345").is_err());
    assert!(parse_css_color("#zzzzzz").is_err());
}

#[test]
fn parses_functional_forms() {
    assert_eq!(
        parse_css_color("rgb(10, 20, 30)").unwrap(),
        Rgba8::opaque(10, 20, 30)
    );
    let half = parse_css_color("rgba(10, 20, 30, 0.5)").unwrap();
    assert_eq!((half.r, half.g, half.b), (10, 20, 30));
    assert!((127..=128).contains(&half.a));
    assert_eq!(
        parse_css_color("hsl(0, 100%, 50%)").unwrap(),
        Rgba8::opaque(255, 0, 0)
    );
}

#[test]
fn parses_full_named_colour_table_case_insensitively() {
    assert_eq!(parse_css_color("White").unwrap(), Rgba8::WHITE);
    assert_eq!(parse_css_color(" black ").unwrap(), Rgba8::BLACK);
    assert_eq!(
        parse_css_color("rebeccapurple").unwrap(),
        Rgba8::opaque(0x66, 0x33, 0x99)
    );
    assert_eq!(
        parse_css_color("CornflowerBlue").unwrap(),
        Rgba8::opaque(100, 149, 237)
    );
}

#[test]
fn fill_color_falls_back_to_black() {
    assert_eq!(fill_color("not-a-colour"), DEFAULT_FILL);
    assert_eq!(fill_color(""), DEFAULT_FILL);
    assert_eq!(fill_color("#336699"), Rgba8::opaque(0x33, 0x66, 0x99));
}
