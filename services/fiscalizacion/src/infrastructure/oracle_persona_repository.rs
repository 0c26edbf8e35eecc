/// PersonaRepositoryのOracle実装
///
/// 固定のパラメーター化SQLを1本だけ実行する。Oracle 11g互換の構文のみ使用。
use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::{Persona, PersonaFilter};

use super::oracle_connection::{OracleConnectionProvider, QueryError};
use super::persona_repository::{PersonaRepository, PersonaRepositoryError};
use super::row_mapping::map_persona;

/// バインド変数名: 氏名パターン（エスケープ・大文字化済み、条件なしはNULL）
pub const BIND_NOMBRE: &str = "nombre";

/// バインド変数名: オペレーター種別コード
pub const BIND_TIPO_OPERADOR: &str = "tipoOperador";

/// ペルソナ検索SQL
///
/// - 有効（`activa = 'S'`）かつRUT識別子を持つペルソナ
/// - `:nombre`がNULLなら氏名条件なし、それ以外は大文字同士の部分一致（`\`でエスケープ）
/// - RUTが、指定種別の有効な運用（`esta = 1`, `esta_do = '1'`）を持つ
///   オペレーターのRUT（ドット除去）に含まれる
/// - 重複排除、`P.nombre`昇順
pub const SEARCH_PERSONAS_SQL: &str = r#"SELECT DISTINCT P.id                 AS Id,
                P.activa             AS Activa,
                P.nombre             AS Nombre,
                P.codigoaduana       AS CodigoAduana,
                P.nacionalextranjera AS NacionalExtranjera,
                V.valor              AS RUT
FROM   per_persona P,
       per_valoridentificador V
WHERE  V.persona = P.id
       AND P.activa = 'S'
       AND ( :nombre IS NULL
              OR :nombre = ''
              OR Upper(P.nombre) LIKE Upper('%' || :nombre || '%') ESCAPE '\' )
       AND tipoidentificador = 'RUT'
       AND V.valor IN (SELECT DISTINCT Replace(rpta.rut, '.', '') RUT
                       FROM   (SELECT po.rut_operador      AS rut,
                                      toc.estadooper       AS esta,
                                      toc.estado           AS esta_do,
                                      (SELECT codigo
                                       FROM   admsirote.nwop_tipo_operador
                                       WHERE  id = toc.tipo_operador) descripcion
                               FROM   admsirote.nwop_operacion_aduana toc
                                      LEFT JOIN admsirote.nwop_operador po
                                             ON opadu_rut_operador = rut_operador) rpta
                       WHERE  rpta.esta = 1
                              AND rpta.esta_do = '1'
                              AND Upper(rpta.descripcion) = Upper(:tipoOperador))
ORDER  BY P.nombre ASC"#;

/// Oracleに対するペルソナ検索
#[derive(Debug, Clone)]
pub struct OraclePersonaRepository {
    provider: OracleConnectionProvider,
}

impl OraclePersonaRepository {
    pub fn new(provider: OracleConnectionProvider) -> Self {
        Self { provider }
    }

    fn run_query(
        conn: &oracle::Connection,
        nombre: Option<String>,
        tipo_operador: &'static str,
    ) -> Result<Vec<Persona>, QueryError> {
        let rows = conn.query_named(
            SEARCH_PERSONAS_SQL,
            &[(BIND_NOMBRE, &nombre), (BIND_TIPO_OPERADOR, &tipo_operador)],
        )?;

        let mut personas = Vec::new();
        for row_result in rows {
            let row = row_result?;
            personas.push(map_persona(&row)?);
        }
        Ok(personas)
    }
}

#[async_trait]
impl PersonaRepository for OraclePersonaRepository {
    async fn search(&self, filter: &PersonaFilter) -> Result<Vec<Persona>, PersonaRepositoryError> {
        let nombre = filter.nombre_pattern();
        let tipo_operador = filter.tipo_operador().as_str();

        debug!(
            nombre = nombre.as_deref().unwrap_or("(vacío)"),
            tipo_operador = tipo_operador,
            "Oracleでペルソナを検索します"
        );

        let personas = self
            .provider
            .with_connection(move |conn| Self::run_query(conn, nombre, tipo_operador))
            .await?;

        info!(rows = personas.len(), "Oracleのペルソナ検索が完了しました");
        Ok(personas)
    }
}
