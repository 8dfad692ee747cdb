/// 启动横幅
pub const BANNER: &str = r#"
 _     _ _              ____        _
| |   (_) |_ __ _ ___  | __ )  ___ | |_
| |   | | __/ _` / __| |  _ \ / _ \| __|
| |___| | || (_| \__ \ | |_) | (_) | |_
|_____|_|\__\__,_|___/ |____/ \___/ \__|
"#;
