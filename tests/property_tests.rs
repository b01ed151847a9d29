use forumlib::api::transport::{QueryValue, prepare_params};
use forumlib::config::AppConfig;
use forumlib::internal::models::{
    Body, CATEGORY_PAGE, DISCUSSION, NameVersion, Op, OpAttributes, USER, User, UserAgent,
};
use forumlib::{Decoder, Value, decode};
use proptest::collection::{hash_map, vec};
use proptest::option;
use proptest::prelude::*;
use serde_json::{Value as Json, json};

fn arb_user() -> impl Strategy<Value = User> {
    (
        option::of(any::<i64>()),
        option::of("\\PC{0,12}"),
        option::of("[a-z]{1,8}\\.png"),
    )
        .prop_map(|(id, username, avatar)| User {
            id,
            username,
            avatar,
        })
}

fn arb_op() -> impl Strategy<Value = Op> {
    let attributes = (
        option::of(any::<bool>()),
        option::of(any::<bool>()),
        option::of("https://[a-z]{1,10}\\.me/[a-z]{0,6}"),
    )
        .prop_map(|(italic, bold, link)| OpAttributes { italic, bold, link });
    (option::of("\\PC{0,16}"), option::of(attributes))
        .prop_map(|(insert, attributes)| Op { insert, attributes })
}

fn arb_name_version() -> impl Strategy<Value = NameVersion> {
    (option::of("[A-Za-z]{1,8}"), option::of("[0-9]{1,3}(\\.[0-9]{1,3}){0,2}"))
        .prop_map(|(name, version)| NameVersion { name, version })
}

fn arb_body() -> impl Strategy<Value = Body> {
    let agent = (
        option::of(arb_name_version()),
        option::of(arb_name_version()),
        option::of(any::<bool>()),
        option::of(any::<bool>()),
        option::of(any::<bool>()),
    )
        .prop_map(
            |(platform, browser, is_mobile, is_tablet, is_desktop)| UserAgent {
                platform,
                browser,
                is_mobile,
                is_tablet,
                is_desktop,
            },
        );
    (option::of(vec(arb_op(), 0..5)), option::of(agent))
        .prop_map(|(ops, user_agent)| Body { ops, user_agent })
}

fn arb_json() -> impl Strategy<Value = Json> {
    let leaf = prop_oneof![
        Just(Json::Null),
        any::<bool>().prop_map(Json::Bool),
        any::<i64>().prop_map(Json::from),
        any::<f64>().prop_map(Json::from),
        "\\PC{0,8}".prop_map(Json::String),
    ];
    let key = prop_oneof![
        prop::sample::select(vec![
            "id",
            "title",
            "data",
            "user",
            "current_page",
            "next_page_url",
            "discussion",
            "post",
            "body",
            "ops",
            "insert",
            "attributes",
            "userAgent",
        ])
        .prop_map(String::from),
        "[a-z_]{1,8}",
    ]
    .boxed();
    leaf.prop_recursive(4, 48, 6, move |inner| {
        prop_oneof![
            vec(inner.clone(), 0..6).prop_map(Json::Array),
            hash_map(key.clone(), inner, 0..6)
                .prop_map(|m| Json::Object(m.into_iter().collect())),
        ]
    })
}

fn full_discussion() -> Json {
    json!({
        "id": 1,
        "title": "t",
        "category_id": 5,
        "user_id": 2,
        "created_at": "2024-01-01 00:00:00",
        "updated_at": "2024-01-02 00:00:00",
        "last_post_at": "2024-01-03 00:00:00",
        "user": {"id": 2, "username": "u"},
        "views_count": 10,
        "posts_count": 3,
        "is_locked": false,
        "is_sticky": false
    })
}

proptest! {
    #[test]
    fn test_unknown_keys_are_ignored(
        user in arb_user(),
        extra in hash_map("x_[a-z]{1,8}", arb_json(), 0..6),
    ) {
        let plain = serde_json::to_value(&user).unwrap();
        let mut noisy = plain.clone();
        for (key, value) in extra {
            noisy[key.as_str()] = value;
        }
        prop_assert_eq!(decode(&USER, &noisy).unwrap(), decode(&USER, &plain).unwrap());
    }

    #[test]
    fn test_missing_keys_decode_to_null(mask in vec(any::<bool>(), 12)) {
        let mut raw = full_discussion();
        let names: Vec<&str> = DISCUSSION.field_names().collect();
        let object = raw.as_object_mut().unwrap();
        for (name, drop) in names.iter().zip(&mask) {
            if *drop {
                object.remove(*name);
            }
        }

        let model = decode(&DISCUSSION, &raw).unwrap();
        for (name, dropped) in names.iter().zip(&mask) {
            let value = model.get(name).unwrap();
            prop_assert_eq!(value.is_null(), *dropped, "field {}", name);
        }
    }

    #[test]
    fn test_user_round_trip(user in arb_user()) {
        let raw = serde_json::to_value(&user).unwrap();
        let decoded: User = Decoder::new().decode_record(&raw).unwrap();
        prop_assert_eq!(decoded, user);
    }

    #[test]
    fn test_body_round_trip(body in arb_body()) {
        let raw = serde_json::to_value(&body).unwrap();
        let decoded: Body = Decoder::new().decode_record(&raw).unwrap();
        prop_assert_eq!(decoded, body);
    }

    #[test]
    fn test_page_is_clamped(page in any::<i64>()) {
        let prepared = prepare_params(&[("page".to_string(), QueryValue::Int(page))]).unwrap();
        let sent: i64 = prepared[0].1.parse().unwrap();
        prop_assert!(sent >= 1);
        prop_assert_eq!(sent, page.max(1));
    }

    #[test]
    fn test_decoder_never_panics(raw in arb_json()) {
        // Any input either decodes or yields a typed error
        if let Ok(model) = decode(&CATEGORY_PAGE, &raw) {
            prop_assert!(raw.is_object());
            prop_assert!(model.fields().count() > 0);
        }
        let _ = Decoder::new().with_embedded_json(false).decode(&DISCUSSION, &raw);
    }

    #[test]
    fn test_decoded_strings_survive(text in "\\PC{0,24}") {
        let model = decode(&USER, &json!({"username": text.clone()})).unwrap();
        prop_assert_eq!(model.get("username"), Some(&Value::String(text)));
    }

    #[test]
    fn test_config_parsing_resilience(s in "\\PC*") {
        // Fuzz the config loader with random strings
        // It should return an Err, but not panic
        let _ = AppConfig::from_ron_str(&s, "fuzz");
    }
}
