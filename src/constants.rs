//! # Constantes do Sistema PSINet
//!
//! Centralização de todas as constantes padrão do simulador, com documentação
//! sobre fundamentação biológica e valores de referência.
//!
//! ## Organização
//!
//! - **Timing**: Constantes temporais (passo de integração, tau de membrana,
//!   período refratário, janelas STDP)
//! - **Learning**: Amplitudes e limites das regras de plasticidade
//! - **Column**: Parâmetros estruturais da coluna E/I
//! - **Encoding**: Parâmetros da codificação imagem → taxa de disparo
//!
//! Todos os tempos são expressos em **milissegundos** e as taxas em **Hz**.

/// Versão atual da biblioteca
pub const VERSION: &str = "0.1.0";

/// Nome do projeto
pub const PROJECT_NAME: &str = "PSINet";

// ============================================================================
// CONSTANTES TEMPORAIS (TIMING)
// ============================================================================

/// Módulo com constantes temporais do simulador
pub mod timing {
    /// Passo de integração padrão (ms)
    ///
    /// 0.1ms é o passo clássico para simulação de neurônios LIF: curto o
    /// bastante para resolver períodos refratários de poucos ms.
    pub const DT: f64 = 0.1;

    /// Constante de tempo da membrana (ms)
    ///
    /// Neurônios corticais têm tau de membrana típico de 10-30ms.
    pub const MEMBRANE_TAU: f64 = 10.0;

    /// Período refratário absoluto (ms)
    pub const REFRACTORY_PERIOD: f64 = 5.0;

    /// Constante de tempo do traço pré-sináptico (ms)
    ///
    /// Referência: Bi & Poo (1998) - janelas STDP efetivas de 20-40ms
    pub const STDP_TAU_PRE: f64 = 20.0;

    /// Constante de tempo do traço pós-sináptico (ms)
    pub const STDP_TAU_POST: f64 = 20.0;
}

// ============================================================================
// PLASTICIDADE (LEARNING)
// ============================================================================

/// Módulo com constantes das regras de aprendizado
pub mod learning {
    /// Incremento do traço pré a cada disparo pré-sináptico
    pub const STDP_A_PRE: f64 = 0.01;

    /// Incremento do traço pós a cada disparo pós-sináptico
    ///
    /// Ligeiramente mais negativo do que `STDP_A_PRE` é positivo: a
    /// depressão domina por pouco, o que estabiliza o aprendizado
    /// não supervisionado.
    pub const STDP_A_POST: f64 = -0.0105;

    /// Peso sináptico máximo para sinapses plásticas
    pub const STDP_W_MAX: f64 = 0.01;

    /// Peso máximo para projeções plásticas entre camadas da hierarquia
    pub const LAYER_W_MAX: f64 = 0.3;

    /// Incremento pré para projeções entre camadas
    pub const LAYER_A_PRE: f64 = 0.01;

    /// Incremento pós para projeções entre camadas
    pub const LAYER_A_POST: f64 = -0.01;

    /// Peso fixo usado quando a conexão entre camadas é estática
    pub const STATIC_LAYER_WEIGHT: f64 = 0.2;
}

// ============================================================================
// COLUNA E/I (COLUMN)
// ============================================================================

/// Módulo com parâmetros estruturais da coluna excitatória/inibitória
pub mod column {
    /// Número padrão de neurônios excitatórios
    pub const N_EXCITATORY: usize = 100;

    /// Número padrão de neurônios inibitórios
    ///
    /// Proporção 4:1 E/I, consistente com a anatomia cortical.
    pub const N_INHIBITORY: usize = 25;

    /// Peso fixo da projeção E→I
    pub const EXC_TO_INH_WEIGHT: f64 = 0.25;

    /// Força padrão da inibição lateral (multiplica o peso I→E)
    pub const LATERAL_STRENGTH: f64 = 0.2;

    /// Peso (em módulo) da projeção opcional I→I
    pub const SELF_INHIBITION_WEIGHT: f64 = 0.1;
}

// ============================================================================
// CODIFICAÇÃO DE ENTRADA (ENCODING)
// ============================================================================

/// Módulo com parâmetros da codificação de imagens em taxas
pub mod encoding {
    /// Taxa mínima de disparo (Hz)
    pub const MIN_RATE: f64 = 0.0;

    /// Taxa máxima de disparo (Hz)
    pub const MAX_RATE: f64 = 100.0;

    /// Valor de fundo de escala dos pixels (imagens de 8 bits)
    pub const FULL_SCALE: f64 = 255.0;
}

// ============================================================================
// PARÂMETROS DO NEURÔNIO (NEURON)
// ============================================================================

/// Módulo com parâmetros padrão do neurônio LIF
pub mod neuron {
    /// Limiar de disparo (adimensional)
    pub const THRESHOLD: f64 = 1.0;

    /// Potencial após o reset
    pub const RESET: f64 = 0.0;
}
