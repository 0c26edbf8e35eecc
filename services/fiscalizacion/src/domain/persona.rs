//! ペルソナ検索結果のドメインモデル
//!
//! クエリ結果としてのみ生成され、独立したライフサイクルは持たない。

use serde::{Deserialize, Serialize};

/// ペルソナ（検索結果の1行）
///
/// JSONのフィールド名はcamelCase（`codigoAduana`, `nacionalExtranjera`）。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Persona {
    /// per_persona.id
    pub id: i64,
    /// 有効フラグ（"S" / "N"）
    pub activa: String,
    /// 氏名・名称
    pub nombre: String,
    /// 税関コード
    pub codigo_aduana: String,
    /// 国内/外国区分（"N" / "E"）
    pub nacional_extranjera: String,
    /// RUT（per_valoridentificador.valor）
    pub rut: String,
}

/// ペルソナ検索のレスポンス
///
/// `rows_count`は常に`personas.len()`と一致する。
/// 不変条件を守るためフィールドは非公開とし、`new`経由でのみ構築する。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonaList {
    personas: Vec<Persona>,
    rows_count: usize,
}

impl PersonaList {
    pub fn new(personas: Vec<Persona>) -> Self {
        let rows_count = personas.len();
        Self {
            personas,
            rows_count,
        }
    }

    pub fn personas(&self) -> &[Persona] {
        &self.personas
    }

    pub fn rows_count(&self) -> usize {
        self.rows_count
    }
}

impl From<Vec<Persona>> for PersonaList {
    fn from(personas: Vec<Persona>) -> Self {
        Self::new(personas)
    }
}
