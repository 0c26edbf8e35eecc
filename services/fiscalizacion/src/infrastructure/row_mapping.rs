// 結果行からPersonaへの変換
//
// ドライバーは列名を別名の大文字形（ID）または別名どおり（Id）で返しうるため、
// フィールドごとに受け付ける列名を順に調べる。

use crate::domain::Persona;

use super::oracle_connection::QueryError;

/// フィールドと受け付ける列名・欠損時の既定値
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMapping {
    pub field: &'static str,
    pub columns: &'static [&'static str],
    pub default: &'static str,
}

pub const ID_COLUMN: ColumnMapping = ColumnMapping {
    field: "id",
    columns: &["ID", "Id"],
    default: "0",
};

pub const ACTIVA_COLUMN: ColumnMapping = ColumnMapping {
    field: "activa",
    columns: &["ACTIVA", "Activa"],
    default: "N",
};

pub const NOMBRE_COLUMN: ColumnMapping = ColumnMapping {
    field: "nombre",
    columns: &["NOMBRE", "Nombre"],
    default: "",
};

pub const CODIGO_ADUANA_COLUMN: ColumnMapping = ColumnMapping {
    field: "codigoAduana",
    columns: &["CODIGOADUANA", "CodigoAduana"],
    default: "",
};

pub const NACIONAL_EXTRANJERA_COLUMN: ColumnMapping = ColumnMapping {
    field: "nacionalExtranjera",
    columns: &["NACIONALEXTRANJERA", "NacionalExtranjera"],
    default: "",
};

pub const RUT_COLUMN: ColumnMapping = ColumnMapping {
    field: "rut",
    columns: &["RUT"],
    default: "",
};

/// 列名で値を取り出せる行
pub trait ColumnSource {
    /// 列の値を文字列で取得する（列が無い、またはNULLの場合は`None`）
    fn column_text(&self, column: &str) -> Result<Option<String>, QueryError>;
}

impl ColumnSource for oracle::Row {
    fn column_text(&self, column: &str) -> Result<Option<String>, QueryError> {
        let Some(index) = self
            .column_info()
            .iter()
            .position(|info| info.name() == column)
        else {
            return Ok(None);
        };

        self.get::<usize, Option<String>>(index)
            .map_err(|e| QueryError::Mapping(format!("{column}: {e}")))
    }
}

impl ColumnMapping {
    /// 最初に見つかった空でない値、なければ既定値
    pub fn read(&self, row: &impl ColumnSource) -> Result<String, QueryError> {
        for column in self.columns {
            if let Some(value) = row.column_text(column)?.filter(|v| !v.is_empty()) {
                return Ok(value);
            }
        }
        Ok(self.default.to_string())
    }
}

/// 1行をPersonaに変換する
pub fn map_persona(row: &impl ColumnSource) -> Result<Persona, QueryError> {
    let id_text = ID_COLUMN.read(row)?;
    let id = parse_id(&id_text)?;

    Ok(Persona {
        id,
        activa: ACTIVA_COLUMN.read(row)?,
        nombre: NOMBRE_COLUMN.read(row)?,
        codigo_aduana: CODIGO_ADUANA_COLUMN.read(row)?,
        nacional_extranjera: NACIONAL_EXTRANJERA_COLUMN.read(row)?,
        rut: RUT_COLUMN.read(row)?,
    })
}

// NUMBER列は"123"や"123.0"の形で返りうる
fn parse_id(text: &str) -> Result<i64, QueryError> {
    let trimmed = text.trim();
    trimmed
        .parse::<i64>()
        .ok()
        .or_else(|| {
            trimmed
                .parse::<f64>()
                .ok()
                .filter(|v| v.fract() == 0.0 && v.is_finite())
                .map(|v| v as i64)
        })
        .ok_or_else(|| QueryError::Mapping(format!("{}: 数値に変換できません: {trimmed}", ID_COLUMN.field)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    impl ColumnSource for HashMap<&str, Option<&str>> {
        fn column_text(&self, column: &str) -> Result<Option<String>, QueryError> {
            Ok(self
                .get(column)
                .and_then(|value| value.map(str::to_string)))
        }
    }

    #[test]
    fn test_maps_uppercase_columns() {
        let row: HashMap<&str, Option<&str>> = HashMap::from([
            ("ID", Some("42")),
            ("ACTIVA", Some("S")),
            ("NOMBRE", Some("ARAOS LTDA")),
            ("CODIGOADUANA", Some("39")),
            ("NACIONALEXTRANJERA", Some("N")),
            ("RUT", Some("76123456-7")),
        ]);

        let persona = map_persona(&row).unwrap();
        assert_eq!(persona.id, 42);
        assert_eq!(persona.activa, "S");
        assert_eq!(persona.nombre, "ARAOS LTDA");
        assert_eq!(persona.codigo_aduana, "39");
        assert_eq!(persona.nacional_extranjera, "N");
        assert_eq!(persona.rut, "76123456-7");
    }

    #[test]
    fn test_maps_alias_case_columns() {
        let row: HashMap<&str, Option<&str>> = HashMap::from([
            ("Id", Some("7")),
            ("Activa", Some("S")),
            ("Nombre", Some("COURIER SUR")),
            ("CodigoAduana", Some("48")),
            ("NacionalExtranjera", Some("E")),
            ("RUT", Some("1-9")),
        ]);

        let persona = map_persona(&row).unwrap();
        assert_eq!(persona.id, 7);
        assert_eq!(persona.nombre, "COURIER SUR");
        assert_eq!(persona.nacional_extranjera, "E");
    }

    #[test]
    fn test_uppercase_column_wins() {
        let row: HashMap<&str, Option<&str>> =
            HashMap::from([("NOMBRE", Some("A")), ("Nombre", Some("B")), ("ID", Some("1"))]);

        assert_eq!(map_persona(&row).unwrap().nombre, "A");
    }

    #[test]
    fn test_missing_and_null_columns_use_defaults() {
        let row: HashMap<&str, Option<&str>> =
            HashMap::from([("ACTIVA", None), ("NOMBRE", Some(""))]);

        let persona = map_persona(&row).unwrap();
        assert_eq!(persona.id, 0);
        assert_eq!(persona.activa, "N");
        assert_eq!(persona.nombre, "");
        assert_eq!(persona.codigo_aduana, "");
        assert_eq!(persona.nacional_extranjera, "");
        assert_eq!(persona.rut, "");
    }

    #[test]
    fn test_id_accepts_decimal_representation() {
        let row: HashMap<&str, Option<&str>> = HashMap::from([("ID", Some("15.0"))]);
        assert_eq!(map_persona(&row).unwrap().id, 15);
    }

    #[test]
    fn test_non_numeric_id_is_mapping_error() {
        let row: HashMap<&str, Option<&str>> = HashMap::from([("ID", Some("abc"))]);

        match map_persona(&row) {
            Err(QueryError::Mapping(message)) => assert!(message.contains("abc")),
            other => panic!("Expected mapping error, got {:?}", other),
        }
    }
}
