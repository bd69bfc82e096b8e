//! # Módulo de Plasticidade Sináptica
//!
//! Regras de aprendizado acopláveis a uma projeção sináptica. A plasticidade
//! é um **comportamento anexado** à projeção, não um tipo de projeção
//! diferente: a interface de conectividade e acesso a pesos é a mesma com ou
//! sem aprendizado.
//!
//! ## Componentes
//!
//! - `StdpConfig`: parâmetros da regra STDP por projeção
//! - `StdpState`: traços de elegibilidade por sinapse e ramos de evento

mod stdp;

pub use stdp::{StdpConfig, StdpState};
