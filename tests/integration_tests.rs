//! Integration tests for flavor_map library

use flavor_map::map::{decode_data_flavor, encode_data_flavor, encode_java_mime_type};
use flavor_map::*;
use proptest::prelude::*;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

fn hash_of<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

#[test]
fn test_mime_type_parsing_and_formatting() {
    let original = "Text/HTML; Charset=UTF-8; note=\"a b\"; empty=\"\"";
    let mime = MimeType::parse(original).unwrap();
    assert_eq!(mime.base_type(), "text/html");
    assert_eq!(mime.parameter("charset"), Some("UTF-8"));
    assert_eq!(mime.parameter("note"), Some("a b"));
    assert_eq!(mime.parameter("empty"), Some(""));

    let formatted = mime.to_string();
    assert_eq!(formatted, "text/html; charset=UTF-8; note=\"a b\"; empty=\"\"");
    assert_eq!(MimeType::parse(&formatted).unwrap(), mime);
}

#[test]
fn test_parse_errors() {
    assert!(matches!(MimeType::parse("text"), Err(ParseError::MissingSubType)));
    assert!(MimeType::parse("text;a=b/plain").is_err());
    assert!(MimeType::parse("te xt/plain").is_err());
    assert!(MimeType::parse("text/plain; charset").is_err());
    assert!(MimeType::parse("text/plain; charset=\"open").is_err());

    let err: Error = DataFlavor::new("text").unwrap_err();
    assert!(matches!(err, Error::Parse(ParseError::MissingSubType)));
}

proptest! {
    #[test]
    fn prop_mime_type_round_trip(
        primary in "[a-z][a-z0-9+.-]{0,8}",
        sub in "[a-z][a-z0-9+.-]{0,8}",
        params in proptest::collection::vec(("[a-z][a-z0-9-]{0,6}", "[ -~]{0,10}"), 0..4),
    ) {
        let mut raw = format!("{}/{}", primary, sub);
        for (name, value) in &params {
            let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
            raw.push_str(&format!("; {}=\"{}\"", name, escaped));
        }
        let parsed = MimeType::parse(&raw).unwrap();
        let reparsed = MimeType::parse(&parsed.to_string()).unwrap();
        prop_assert_eq!(&reparsed, &parsed);
        prop_assert_eq!(hash_of(&reparsed), hash_of(&parsed));
    }

    #[test]
    fn prop_flavor_is_mime_type_equal_to_itself(
        sub in "(plain|html|rtf|xml|uri-list|csv)",
        charset in "(UTF-8|utf8|UTF-16LE|ISO-8859-1|US-ASCII)",
        class in "(java\\.io\\.InputStream|java\\.io\\.Reader|java\\.lang\\.String|\\[B|java\\.nio\\.CharBuffer)",
    ) {
        let flavor = DataFlavor::new(&format!("text/{}; charset={}; class=\"{}\"", sub, charset, class)).unwrap();
        prop_assert!(flavor.is_mime_type_equal(&flavor.mime_type()));
        let again = DataFlavor::new(&flavor.mime_type()).unwrap();
        prop_assert_eq!(&again, &flavor);
        prop_assert_eq!(hash_of(&again), hash_of(&flavor));
    }
}

#[test]
fn test_equal_flavors_hash_equal() {
    let pairs = [
        ("text/plain; charset=utf8", "text/plain; charset=UTF-8"),
        ("text/plain; charset=unicode", "text/plain; charset=UTF-16"),
        ("text/*; class=java.lang.String", "text/xml; class=java.lang.String"),
        ("text/html; charset=UTF-8; class=java.io.Reader", "text/html; class=java.io.Reader"),
        ("text/rtf; charset=x-nothing", "text/rtf"),
    ];
    for (a, b) in pairs {
        let a = DataFlavor::new(a).unwrap();
        let b = DataFlavor::new(b).unwrap();
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }
}

#[test]
fn test_configured_natives_round_trip() {
    let map = FlavorMap::builder().build();
    for native in map.all_natives() {
        let flavors = map.flavors_for_native(&native);
        assert!(!flavors.is_empty(), "{} has no flavors", native);
        let natives = map.natives_for_flavor(&flavors[0]);
        assert!(natives.contains(&native), "{} not found for {}", native, flavors[0]);
    }
}

#[test]
fn test_pinned_flavor_never_synthesized() {
    let map = FlavorMap::builder().build();
    let flavor = DataFlavor::new("application/x-pinned-test").unwrap();
    map.set_natives_for_flavor(&flavor, &["X"]).unwrap();
    assert_eq!(map.natives_for_flavor(&flavor), vec!["X"]);
    assert!(!map.all_natives().contains(&encode_data_flavor(&flavor)));
}

#[test]
fn test_added_flavor_ranks_ahead_on_empty_map() {
    let map = FlavorMap::builder().without_defaults().build();
    map.add_flavor_for_unencoded_native("STRING", string_flavor()).unwrap();
    let flavors = map.flavors_for_native("STRING");
    assert_eq!(&flavors[0], string_flavor());
}

#[test]
fn test_unknown_native() {
    let map = FlavorMap::builder().build();
    assert!(map.flavors_for_native("UNKNOWN_XYZ").is_empty());
    let bulk = map.flavors_for_natives(&["UNKNOWN_XYZ"]);
    assert_eq!(bulk.get("UNKNOWN_XYZ"), Some(&None));
}

#[test]
fn test_encoded_native_round_trip() {
    let flavor = DataFlavor::new("application/x-custom;class=java.lang.String").unwrap();
    let native = encode_data_flavor(&flavor);
    assert_eq!(
        native,
        encode_java_mime_type("application/x-custom; class=java.lang.String")
    );
    let decoded = decode_data_flavor(&native).unwrap().unwrap();
    assert_eq!(decoded.mime_type(), flavor.mime_type());

    // a fresh map learns both directions from the encoded native
    let map = FlavorMap::builder().without_defaults().build();
    assert_eq!(map.flavors_for_native(&native), vec![flavor.clone()]);
    assert_eq!(map.natives_for_flavor(&flavor), vec![native]);
}

#[test]
fn test_select_best_text_flavor() {
    let html = DataFlavor::new("text/html; charset=UTF-8; class=java.io.InputStream").unwrap();
    let plain = DataFlavor::new("text/plain; class=java.lang.String").unwrap();
    assert_eq!(select_best_text_flavor(&[html.clone(), plain.clone()]), Some(&html));
    assert_eq!(select_best_text_flavor(&[plain.clone(), html.clone()]), Some(&html));
    assert_eq!(select_best_text_flavor(&[image_flavor().clone()]), None);
}

#[test]
fn test_best_flavor_for_configured_natives() {
    let map = FlavorMap::builder().build();

    let unicode = map.flavors_for_native("UNICODE TEXT");
    // the serialized String outranks every text/plain variant
    assert_eq!(select_best_text_flavor(&unicode), Some(string_flavor()));

    let html = map.flavors_for_native("HTML Format");
    let best = select_best_text_flavor(&html).unwrap();
    assert_eq!(best.mime().base_type(), "text/html");
    assert!(best.is_representation_class_reader());

    let rtf = map.flavors_for_native("Rich Text Format");
    let best = select_best_text_flavor(&rtf).unwrap();
    assert!(best.is_representation_class_input_stream());
}

#[test]
fn test_text_properties_from_bundled_configuration() {
    let platform = Arc::new(StaticPlatformMappings::new());
    let map = FlavorMap::builder().platform(platform.clone()).build();

    let unicode = map.text_properties_for_native("UNICODE TEXT").unwrap();
    assert_eq!(unicode.charset.as_deref(), Some("utf-16le"));
    assert_eq!(unicode.eoln.as_deref(), Some("\r\n"));
    assert_eq!(unicode.terminators, Some(2));
    assert_eq!(platform.text_properties("HTML Format").unwrap().terminators, Some(1));

    assert_eq!(map.text_properties_for_native("PNG / JFIF"), None);
}

#[test]
fn test_platform_and_runtime_mappings() {
    let bitmap = DataFlavor::new("image/bmp").unwrap();
    let platform = Arc::new(StaticPlatformMappings::new().with_mapping("CF_DIB", bitmap.clone()));

    let map = FlavorMap::builder().platform(platform).build();
    map.add_unencoded_native_for_flavor(&bitmap, "BMP_FALLBACK").unwrap();
    assert_eq!(map.natives_for_flavor(&bitmap), vec!["CF_DIB", "BMP_FALLBACK"]);

    let map_of_natives = map.natives_for_flavors(&[bitmap.clone(), string_flavor().clone()]);
    assert_eq!(map_of_natives[&bitmap].as_deref(), Some("CF_DIB"));
    assert_eq!(map_of_natives[string_flavor()].as_deref(), Some("UTF8_STRING"));
}

#[test]
fn test_text_plain_unicode_flavor_follows_platform() {
    struct Wide;
    impl PlatformMappings for Wide {
        fn mappings_for_native(&self, _native: &str) -> Vec<DataFlavor> {
            Vec::new()
        }
        fn mappings_for_flavor(&self, _flavor: &DataFlavor) -> Vec<String> {
            Vec::new()
        }
        fn default_unicode_encoding(&self) -> &str {
            "UTF-16BE"
        }
    }

    let map = FlavorMap::builder().platform(Arc::new(Wide)).build();
    let flavor = map.text_plain_unicode_flavor();
    assert_eq!(flavor.text_charset().unwrap(), "UTF-16BE");
    assert_eq!(flavor.human_presentable_name(), "Plain Text");
}

#[tokio::test]
async fn test_properties_file_merges_with_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("extra.properties");
    tokio::fs::write(
        &path,
        "# site additions\nSVG\\ Image=image/svg+xml\ntext/csv=text/csv;charset=UTF-8\n",
    )
    .await
    .unwrap();

    let map = FlavorMap::builder().properties_file(&path).await.unwrap().build();
    let svg = DataFlavor::new("image/svg+xml").unwrap();
    assert_eq!(map.natives_for_flavor(&svg), vec!["SVG Image"]);
    assert!(map.all_natives().contains(&"UTF8_STRING".to_string()));

    let csv_flavors = map.flavors_for_native("text/csv");
    assert!(csv_flavors.len() > 1);
}

#[test]
fn test_properties_file_blocking() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("one.properties");
    std::fs::write(&path, "ONE=application/x-one;class=java.lang.String\n").unwrap();

    let builder = tokio_test::block_on(FlavorMap::builder().without_defaults().properties_file(&path)).unwrap();
    let map = builder.build();
    assert_eq!(map.all_natives(), vec!["ONE"]);
}

#[tokio::test]
async fn test_missing_properties_file() {
    let result = FlavorMap::builder()
        .properties_file("/nonexistent/flavormap.properties")
        .await;
    match result {
        Err(Error::ConfigLoad(message)) => assert!(message.contains("flavormap.properties")),
        Err(other) => panic!("unexpected error: {}", other),
        Ok(_) => panic!("loading a missing file succeeded"),
    }
}

#[tokio::test]
async fn test_concurrent_lookups() {
    use tokio::task::JoinSet;

    let map = FlavorMap::system();
    let natives = map.all_natives();

    let mut set = JoinSet::new();
    for (i, native) in natives.into_iter().enumerate() {
        let map = Arc::clone(&map);
        set.spawn(async move {
            let custom = DataFlavor::new(&format!("application/x-concurrent-{}", i)).unwrap();
            for _ in 0..100 {
                let flavors = map.flavors_for_native(&native);
                assert!(!flavors.is_empty());
                let synthesized = map.natives_for_flavor(&custom);
                assert_eq!(synthesized, vec![encode_data_flavor(&custom)]);
            }
        });
    }

    while let Some(result) = set.join_next().await {
        result.unwrap();
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_mutation() {
    use tokio::task::JoinSet;

    let map = Arc::new(FlavorMap::builder().without_defaults().build());
    let shared = DataFlavor::new("application/x-shared").unwrap();

    let mut set = JoinSet::new();
    for i in 0..8 {
        let map = Arc::clone(&map);
        let shared = shared.clone();
        set.spawn(async move {
            let native = format!("NATIVE_{}", i);
            map.add_unencoded_native_for_flavor(&shared, &native).unwrap();
            map.add_flavor_for_unencoded_native(&native, &shared).unwrap();
            assert!(map.natives_for_flavor(&shared).contains(&native));
        });
    }

    while let Some(result) = set.join_next().await {
        result.unwrap();
    }

    assert_eq!(map.natives_for_flavor(&shared).len(), 8);
    assert_eq!(map.all_natives().len(), 8);
}
