use serde::Deserialize;

#[derive(Debug, Deserialize, Default, PartialEq)]
struct Section {
    name: String,
    level: u32,
}

#[derive(Debug, Deserialize, Default, PartialEq)]
struct Missing {
    flag: bool,
}

// 全局配置只能初始化一次，所以放在同一个测试里
#[test]
fn global_config_lifecycle() {
    assert!(!easel_shared::config::is_initialized());
    let before: Section = easel_shared::config::get("section");
    assert_eq!(before, Section::default());

    easel_shared::config::init_from_str(
        r#"
[section]
name = "menu"
level = 3

[broken]
flag = "not a bool"
"#,
    )
    .unwrap();
    assert!(easel_shared::config::is_initialized());

    let section: Section = easel_shared::config::get("section");
    assert_eq!(section, Section { name: "menu".into(), level: 3 });

    let broken: Missing = easel_shared::config::get("broken");
    assert_eq!(broken, Missing::default());

    let absent: Missing = easel_shared::config::get("absent");
    assert_eq!(absent, Missing::default());

    assert!(easel_shared::config::init_from_str("").is_err());
}
