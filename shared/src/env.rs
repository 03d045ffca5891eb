use strum::EnumString;

#[derive(Debug, Clone, Copy, Default, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

// 実行環境を ENV 環境変数から判定する。未設定時はビルドプロファイルに従う
pub fn which() -> Environment {
    #[cfg(debug_assertions)]
    let default_env = "development";
    #[cfg(not(debug_assertions))]
    let default_env = "production";

    std::env::var("ENV")
        .unwrap_or_else(|_| default_env.into())
        .parse()
        .unwrap_or_default()
}
