// 税関オペレーター種別
//
// ペルソナ検索の必須フィルター。値の集合は閉じており、
// admsirote.nwop_tipo_operador.codigo と大文字小文字を無視して照合される。

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 未知のオペレーター種別
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("未知のオペレーター種別: {0}")]
pub struct UnknownTipoOperador(pub String);

/// 税関オペレーター種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TipoOperador {
    AgenteNaves,
    LineasAereas,
    EstibasDesestiba,
    Proveedor,
    Multimodal,
    Carga,
    Forwarder,
    Mudanzas,
    Almacenista,
    Courier,
    AgenteAduanas,
    AgenteCabotaje,
    EntidadCertificadora,
    RetiroGarantizado,
    Deposito,
    Zf,
    OpContenedor,
}

impl TipoOperador {
    /// 全種別（API説明・エラーメッセージ用の宣言順）
    pub const ALL: [TipoOperador; 17] = [
        TipoOperador::AgenteNaves,
        TipoOperador::LineasAereas,
        TipoOperador::EstibasDesestiba,
        TipoOperador::Proveedor,
        TipoOperador::Multimodal,
        TipoOperador::Carga,
        TipoOperador::Forwarder,
        TipoOperador::Mudanzas,
        TipoOperador::Almacenista,
        TipoOperador::Courier,
        TipoOperador::AgenteAduanas,
        TipoOperador::AgenteCabotaje,
        TipoOperador::EntidadCertificadora,
        TipoOperador::RetiroGarantizado,
        TipoOperador::Deposito,
        TipoOperador::Zf,
        TipoOperador::OpContenedor,
    ];

    /// SQLバインドおよびクエリパラメーターで使う表記
    pub fn as_str(&self) -> &'static str {
        match self {
            TipoOperador::AgenteNaves => "AGENTE_NAVES",
            TipoOperador::LineasAereas => "LINEAS_AEREAS",
            TipoOperador::EstibasDesestiba => "ESTIBAS_DESESTIBA",
            TipoOperador::Proveedor => "PROVEEDOR",
            TipoOperador::Multimodal => "MULTIMODAL",
            TipoOperador::Carga => "CARGA",
            TipoOperador::Forwarder => "FORWARDER",
            TipoOperador::Mudanzas => "MUDANZAS",
            TipoOperador::Almacenista => "ALMACENISTA",
            TipoOperador::Courier => "COURIER",
            TipoOperador::AgenteAduanas => "AGENTE_ADUANAS",
            TipoOperador::AgenteCabotaje => "AGENTE_CABOTAJE",
            TipoOperador::EntidadCertificadora => "ENTIDAD_CERTIFICADORA",
            TipoOperador::RetiroGarantizado => "RETIRO_GARANTIZADO",
            TipoOperador::Deposito => "DEPOSITO",
            TipoOperador::Zf => "ZF",
            TipoOperador::OpContenedor => "OP_CONTENEDOR",
        }
    }

    /// 全種別をカンマ区切りで列挙する
    pub fn valid_values() -> String {
        Self::ALL
            .iter()
            .map(TipoOperador::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromStr for TipoOperador {
    type Err = UnknownTipoOperador;

    /// 完全一致でパースする（小文字表記は受け付けない）
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|tipo| tipo.as_str() == s)
            .ok_or_else(|| UnknownTipoOperador(s.to_string()))
    }
}

impl fmt::Display for TipoOperador {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
