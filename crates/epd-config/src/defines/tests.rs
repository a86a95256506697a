//! Tests for build define generation.

use super::*;
use crate::{
    schema::{FONT, SCHEMA},
    testonly::sample_with,
};

fn sample_defines(overrides: serde_json::Value) -> Defines {
    let config = SCHEMA.resolve(&sample_with(overrides)).unwrap();
    Defines::from_config(&config)
}

#[test]
fn converting_to_upper_snake_case() {
    let cases = [
        ("pinEpdCS", "PIN_EPD_CS"),
        ("weatherAPI", "WEATHER_API"),
        ("statusBarExtrasWifiRSSI", "STATUS_BAR_EXTRAS_WIFI_RSSI"),
        ("owmApikey", "OWM_APIKEY"),
        ("useImperialUnitsAsDefault", "USE_IMPERIAL_UNITS_AS_DEFAULT"),
        ("wifiSSID", "WIFI_SSID"),
        ("pinEpdMISO", "PIN_EPD_MISO"),
        ("locale", "LOCALE"),
        ("XMLHttp", "XML_HTTP"),
        ("ABc", "A_BC"),
        ("pin2Bus", "PIN2_BUS"),
    ];
    for (input, expected) in cases {
        assert_eq!(upper_snake(input), expected, "{input}");
    }
}

#[test]
fn define_names() {
    let name = |field_name| define_name(SCHEMA.field(field_name).unwrap());
    assert_eq!(name("unitsTemp"), "UNITS_TEMP");
    assert_eq!(name("locale"), "LOCALE");
    assert_eq!(name("font"), "FONT_HEADER");
    assert_eq!(name("city"), "D_CITY");
    assert_eq!(name("owmApikey"), "D_OWM_APIKEY");
    assert_eq!(name("bmeAddress"), "BME_ADDRESS");
    assert_eq!(name("displayAlerts"), "DISPLAY_ALERTS");
}

#[test]
fn font_table_covers_all_fonts() {
    for variant in FONT.variants {
        assert!(font_header(variant.value).is_some(), "{}", variant.value);
    }
    assert_eq!(font_header("Open Sans"), Some("fonts/OpenSans_Regular.h"));
    assert_eq!(font_header("Comic Sans"), None);
}

#[test]
fn inserting_defines() {
    let mut defines = Defines::new();
    defines.insert("A", DefineValue::Int(0));
    defines.insert("B", DefineValue::Int(1));
    defines.insert("A", DefineValue::Int(2));

    let entries: Vec<_> = defines.iter().collect();
    assert_eq!(
        entries,
        [("A", &DefineValue::Int(2)), ("B", &DefineValue::Int(1))]
    );
}

#[test]
fn escaping_c_strings() {
    let value = DefineValue::Str(r#"say "hi" \o/"#.to_owned());
    assert_eq!(value.to_string(), r#""say \"hi\" \\o/""#);
    let value = DefineValue::Str("line\nbreak\u{7}".to_owned());
    assert_eq!(value.to_string(), r#""line\nbreak\007""#);
    assert_eq!(DefineValue::Str("Zürich".to_owned()).to_string(), "\"Zürich\"");
    assert_eq!(DefineValue::Str(String::new()).to_string(), "\"\"");
}

#[test]
fn global_ordinal_defines() {
    let defines = sample_defines(serde_json::json!({}));
    let names: Vec<_> = defines.iter().map(|(name, _)| name).take(4).collect();
    assert_eq!(names, ["DISP_BW_V2", "DISP_3C_B", "DISP_7C_F", "DISP_BW_V1"]);

    assert_eq!(defines.get("DISP_7C_F"), Some(&DefineValue::Int(2)));
    assert_eq!(defines.get("WAVESHARE"), Some(&DefineValue::Int(1)));
    assert_eq!(defines.get("FAHRENHEIT"), Some(&DefineValue::Int(2)));
    assert_eq!(defines.get("POUNDSPERSQUAREINCH"), Some(&DefineValue::Int(7)));
    assert_eq!(defines.get("PRECIP_SMART"), Some(&DefineValue::Int(2)));
    // Locales and fonts are not exported.
    assert_eq!(defines.get("EN_US"), None);
    assert_eq!(defines.get("FREESANS"), None);
}

#[test]
fn duplicate_member_names_take_later_ordinal() {
    let defines = sample_defines(serde_json::json!({}));
    // `WindDirectionLabel` and `WindArrowPrecision` share member names; the latter enum wins.
    assert_eq!(defines.get("WIND_HIDDEN"), Some(&DefineValue::Int(0)));
    assert_eq!(defines.get("CARDINAL"), Some(&DefineValue::Int(1)));
    assert_eq!(defines.get("TERTIARY_INTERCARDINAL"), Some(&DefineValue::Int(4)));
    assert_eq!(defines.get("ANY_360"), Some(&DefineValue::Int(5)));

    let names: Vec<_> = defines
        .iter()
        .map(|(name, _)| name)
        .skip_while(|&name| name != "WIND_HIDDEN")
        .take(8)
        .collect();
    assert_eq!(
        names,
        [
            "WIND_HIDDEN",
            "NUMBER",
            "CARDINAL",
            "INTERCARDINAL",
            "SECONDARY_INTERCARDINAL",
            "TERTIARY_INTERCARDINAL",
            "ANY_360",
            "PRECIP_DISABLED"
        ]
    );
}

#[test]
fn field_defines() {
    let defines = sample_defines(serde_json::json!({
        "useImperialUnitsAsDefault": true,
        "bmeAddress": "0x77",
        "font": "Lato",
        "locale": "de_DE",
        "displayAlerts": false,
    }));

    let expected = [
        ("EPD_PANEL", DefineValue::Symbol("DISP_BW_V2".into())),
        ("EPD_DRIVER", DefineValue::Symbol("DESPI_C02".into())),
        ("LOCALE", DefineValue::Symbol("de_DE".into())),
        ("WEATHER_API", DefineValue::Symbol("OPEN_WEATHER_MAP".into())),
        ("USE_IMPERIAL_UNITS_AS_DEFAULT", DefineValue::Int(1)),
        ("UNITS_TEMP", DefineValue::Symbol("FAHRENHEIT".into())),
        ("UNITS_HOURLY_PRECIP", DefineValue::Symbol("POP".into())),
        ("UNITS_DAILY_PRECIP", DefineValue::Symbol("INCHES".into())),
        ("FONT_HEADER", DefineValue::Str("fonts/Lato_Regular.h".into())),
        ("DISPLAY_ALERTS", DefineValue::Int(0)),
        ("STATUS_BAR_EXTRAS_WIFI_RSSI", DefineValue::Int(0)),
        ("PIN_EPD_CS", DefineValue::Int(13)),
        ("BME_ADDRESS", DefineValue::Int(119)),
        ("D_WIFI_SSID", DefineValue::Str("home".into())),
        ("D_WIFI_PASSWORD", DefineValue::Str("hunter2".into())),
        ("D_OWM_APIKEY", DefineValue::Str("0123456789abcdef".into())),
        ("D_OWM_ONECALL_VERSION", DefineValue::Str("3.0".into())),
        ("D_TIME_FORMAT", DefineValue::Str("%H:%M".into())),
        ("HOURLY_GRAPH_MAX", DefineValue::Int(24)),
    ];
    for (name, value) in expected {
        assert_eq!(defines.get(name), Some(&value), "{name}");
    }
    assert_eq!(defines.get("FONT"), None);
    assert_eq!(defines.get("D_CITY"), Some(&DefineValue::Str("Tartu".into())));

    let field_define_count = defines
        .iter()
        .skip_while(|(name, _)| *name != "EPD_PANEL")
        .count();
    assert_eq!(field_define_count, SCHEMA.fields.len());
}

#[test]
fn null_strings_are_empty() {
    let defines = sample_defines(serde_json::json!({
        "weatherAPI": "Open-Meteo",
        "owmApikey": null,
    }));
    assert_eq!(defines.get("D_OWM_APIKEY"), Some(&DefineValue::Str(String::new())));
    assert_eq!(defines.get("WEATHER_API"), Some(&DefineValue::Symbol("OPEN_METEO".into())));
}

#[test]
fn rendering_defines() {
    let mut defines = Defines::new();
    defines.insert("CELSIUS", DefineValue::Int(1));
    defines.insert("UNITS_TEMP", DefineValue::Symbol("CELSIUS".into()));
    defines.insert("D_CITY", DefineValue::Str("Tartu".into()));

    assert_eq!(
        defines.to_header(),
        "// Generated by epd-config; do not edit.\n\
         #ifndef EPD_CONFIG_DEFINES_H\n\
         #define EPD_CONFIG_DEFINES_H\n\
         \n\
         #define CELSIUS 1\n\
         #define UNITS_TEMP CELSIUS\n\
         #define D_CITY \"Tartu\"\n\
         \n\
         #endif // EPD_CONFIG_DEFINES_H\n"
    );
    assert_eq!(
        defines.to_flags(),
        "-DCELSIUS=1\n-DUNITS_TEMP=CELSIUS\n-DD_CITY=\"Tartu\"\n"
    );
    assert_eq!(
        serde_json::to_string(&defines).unwrap(),
        r#"{"CELSIUS":1,"UNITS_TEMP":"CELSIUS","D_CITY":"\"Tartu\""}"#
    );
}
