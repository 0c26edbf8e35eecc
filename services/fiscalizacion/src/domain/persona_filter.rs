//! ペルソナ検索フィルターとクエリパラメーター検証
//!
//! `GET /personas`のクエリパラメーター（`nombre`, `tipoOperador`）を検証し、
//! SQLへバインドできる形の`PersonaFilter`を構築する。
//! 違反はすべて収集し、まとめて`ValidationErrors`として返す。

use std::collections::HashMap;

use thiserror::Error;

use super::tipo_operador::TipoOperador;

/// クエリパラメーター名: 氏名の部分一致
pub const PARAM_NOMBRE: &str = "nombre";

/// クエリパラメーター名: オペレーター種別
pub const PARAM_TIPO_OPERADOR: &str = "tipoOperador";

/// `nombre`の最大文字数
pub const NOMBRE_MAX_LENGTH: usize = 100;

/// LIKE句のエスケープ文字（SQL側の`ESCAPE '\'`と対応）
pub const LIKE_ESCAPE_CHAR: char = '\\';

/// 検証エラー（違反メッセージの一覧）
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("パラメーター検証エラー: {}", .messages.join("; "))]
pub struct ValidationErrors {
    messages: Vec<String>,
}

impl ValidationErrors {
    pub fn new(messages: Vec<String>) -> Self {
        Self { messages }
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn into_messages(self) -> Vec<String> {
        self.messages
    }
}

/// ペルソナ検索フィルター
///
/// `nombre`はトリム済みの生の値を保持し、空文字は「氏名条件なし」として`None`になる。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonaFilter {
    nombre: Option<String>,
    tipo_operador: TipoOperador,
}

impl PersonaFilter {
    /// 検証済みの値からフィルターを作成する
    pub fn new(nombre: Option<&str>, tipo_operador: TipoOperador) -> Self {
        let nombre = nombre
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        Self {
            nombre,
            tipo_operador,
        }
    }

    /// クエリパラメーターを検証してフィルターを構築する
    ///
    /// # 検証ルール
    /// - `nombre`: 任意。トリム後100文字以内、許可文字のみ
    /// - `tipoOperador`: 必須。`TipoOperador`のいずれか（完全一致）
    /// - 上記以外のパラメーターは受け付けない
    ///
    /// # Returns
    /// * `Ok(PersonaFilter)` - 検証成功
    /// * `Err(ValidationErrors)` - 全ての違反メッセージ
    pub fn from_query(params: &HashMap<String, String>) -> Result<Self, ValidationErrors> {
        let mut messages = Vec::new();

        let nombre = params.get(PARAM_NOMBRE).map(|s| s.trim()).unwrap_or("");
        if !nombre.is_empty() {
            if nombre.chars().count() > NOMBRE_MAX_LENGTH {
                messages.push(format!(
                    "nombre no puede exceder {} caracteres",
                    NOMBRE_MAX_LENGTH
                ));
            }
            if !nombre.chars().all(is_allowed_nombre_char) {
                messages.push("nombre contiene caracteres no permitidos".to_string());
            }
        }

        let tipo_operador = match params.get(PARAM_TIPO_OPERADOR).map(|s| s.trim()) {
            None | Some("") => {
                messages.push("tipoOperador es obligatorio".to_string());
                messages.push(invalid_tipo_operador_message());
                None
            }
            Some(raw) => match raw.parse::<TipoOperador>() {
                Ok(tipo) => Some(tipo),
                Err(_) => {
                    messages.push(invalid_tipo_operador_message());
                    None
                }
            },
        };

        let mut unknown: Vec<&String> = params
            .keys()
            .filter(|k| k.as_str() != PARAM_NOMBRE && k.as_str() != PARAM_TIPO_OPERADOR)
            .collect();
        unknown.sort();
        for key in unknown {
            messages.push(format!("property {} should not exist", key));
        }

        match tipo_operador {
            Some(tipo) if messages.is_empty() => Ok(Self::new(Some(nombre), tipo)),
            _ => Err(ValidationErrors::new(messages)),
        }
    }

    /// トリム済みの氏名条件
    pub fn nombre(&self) -> Option<&str> {
        self.nombre.as_deref()
    }

    pub fn tipo_operador(&self) -> TipoOperador {
        self.tipo_operador
    }

    /// SQLの`:nombre`にバインドする値
    ///
    /// LIKEエスケープ後に大文字化する。氏名条件がない場合は`None`（NULLバインド）。
    pub fn nombre_pattern(&self) -> Option<String> {
        self.nombre.as_deref().map(|n| escape_like(n).to_uppercase())
    }
}

/// LIKEパターン用にエスケープする
///
/// `\` → `\\`、`%` → `\%`、`_` → `\_`。バックスラッシュを最初に処理する。
pub fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push(LIKE_ESCAPE_CHAR);
        }
        escaped.push(c);
    }
    escaped
}

/// `nombre`に許可される文字か判定する
///
/// 英数字、空白、`- _ . , ; : ( )`、スペイン語のアクセント付き母音と`ñ`。
pub fn is_allowed_nombre_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || c.is_whitespace()
        || matches!(c, '-' | '_' | '.' | ',' | ';' | ':' | '(' | ')')
        || "áéíóúÁÉÍÓÚñÑ".contains(c)
}

fn invalid_tipo_operador_message() -> String {
    format!(
        "tipoOperador debe ser uno de los valores válidos: {}",
        TipoOperador::valid_values()
    )
}
