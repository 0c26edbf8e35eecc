// 環境変数ソース
//
// 設定の解決処理をプロセス環境から切り離し、テストではHashMapを渡せるようにする。

use std::collections::HashMap;

/// キー/値形式の設定ソース
pub trait EnvSource {
    /// 値を取得する（未設定の場合は`None`）
    fn get(&self, key: &str) -> Option<String>;

    /// 空白のみの値を未設定として扱って取得する
    fn get_non_empty(&self, key: &str) -> Option<String> {
        self.get(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    /// 候補キーを順に調べ、最初に見つかった空でない値とそのキーを返す
    fn first_non_empty(&self, keys: &[&'static str]) -> Option<(&'static str, String)> {
        keys.iter()
            .find_map(|key| self.get_non_empty(key).map(|value| (*key, value)))
    }
}

/// プロセス環境変数
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

impl EnvSource for HashMap<&str, &str> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).map(|v| v.to_string())
    }
}
