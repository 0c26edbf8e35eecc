// Domain layer modules
pub mod persona;
pub mod persona_filter;
pub mod tipo_operador;

// Re-exports
pub use persona::{Persona, PersonaList};
pub use persona_filter::{
    escape_like, PersonaFilter, ValidationErrors, LIKE_ESCAPE_CHAR, NOMBRE_MAX_LENGTH,
    PARAM_NOMBRE, PARAM_TIPO_OPERADOR,
};
pub use tipo_operador::{TipoOperador, UnknownTipoOperador};
