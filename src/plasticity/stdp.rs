//! # STDP (Spike-Timing-Dependent Plasticity)
//!
//! Regra de aprendizado baseada em traços: cada sinapse mantém um traço pré
//! (`apre`) e um traço pós (`apost`) que decaem exponencialmente. Os traços
//! substituem o armazenamento de timestamps de disparo - a janela temporal
//! efetiva é de alguns `tau_pre`/`tau_post`.
//!
//! ## Ramos de evento
//!
//! - **Disparo pré**: `apre += A_pre`; `w = clip(w + apost, 0, w_max)`
//! - **Disparo pós**: `apost += A_post`; `w = clip(w + apre, 0, w_max)`
//!
//! Com `A_pre > 0` e `A_post < 0` obtém-se STDP Hebbiano clássico:
//! potenciação quando o pré precede o pós dentro da janela, depressão na
//! ordem inversa.
//!
//! A entrega sináptica de um disparo pré usa o peso **anterior** à
//! atualização do próprio evento (`v_post += w` antes de `w += apost`).
//! Essa ordem vem do modelo original e afeta materialmente a dinâmica de
//! aprendizado; está preservada aqui, não alterada.
//!
//! ## Referências
//!
//! - Bi & Poo (1998) - Synaptic modification by correlated activity
//! - Song, Miller & Abbott (2000) - Competitive Hebbian learning through STDP

use crate::constants::{learning, timing};

/// Configuração da regra STDP de uma projeção plástica
#[derive(Debug, Clone)]
pub struct StdpConfig {
    /// Peso sináptico máximo (os pesos vivem em `[0, w_max]`)
    pub w_max: f64,

    /// Incremento do traço pré a cada disparo pré-sináptico (> 0 para
    /// STDP Hebbiano)
    pub a_pre: f64,

    /// Incremento do traço pós a cada disparo pós-sináptico (< 0 para
    /// STDP Hebbiano)
    pub a_post: f64,

    /// Constante de tempo do traço pré (ms), > 0
    pub tau_pre: f64,

    /// Constante de tempo do traço pós (ms), > 0
    pub tau_post: f64,
}

impl Default for StdpConfig {
    fn default() -> Self {
        Self {
            w_max: learning::STDP_W_MAX,
            a_pre: learning::STDP_A_PRE,
            a_post: learning::STDP_A_POST,
            tau_pre: timing::STDP_TAU_PRE,
            tau_post: timing::STDP_TAU_POST,
        }
    }
}

impl StdpConfig {
    /// Configuração padrão das projeções entre camadas da hierarquia
    pub fn for_layer_boundary() -> Self {
        Self {
            w_max: learning::LAYER_W_MAX,
            a_pre: learning::LAYER_A_PRE,
            a_post: learning::LAYER_A_POST,
            ..Self::default()
        }
    }

    /// Valida a configuração.
    ///
    /// Constantes de tempo não positivas são rejeitadas na construção em vez
    /// de substituídas por um piso: indicam erro de parametrização a montante.
    pub fn validate(&self) -> Result<(), String> {
        if !self.tau_pre.is_finite() || self.tau_pre <= 0.0 {
            return Err(format!("tau_pre inválido: {}", self.tau_pre));
        }
        if !self.tau_post.is_finite() || self.tau_post <= 0.0 {
            return Err(format!("tau_post inválido: {}", self.tau_post));
        }
        if !self.w_max.is_finite() || self.w_max < 0.0 {
            return Err(format!("w_max inválido: {}", self.w_max));
        }
        if !self.a_pre.is_finite() || !self.a_post.is_finite() {
            return Err("amplitudes STDP devem ser finitas".to_string());
        }
        Ok(())
    }
}

/// Estado STDP de uma projeção plástica: um par de traços por sinapse
#[derive(Debug, Clone)]
pub struct StdpState {
    config: StdpConfig,

    /// Traço pré-sináptico por sinapse
    apre: Vec<f64>,

    /// Traço pós-sináptico por sinapse
    apost: Vec<f64>,

    /// Fator de decaimento por passo `exp(-dt/tau_pre)`
    decay_pre: f64,

    /// Fator de decaimento por passo `exp(-dt/tau_post)`
    decay_post: f64,
}

impl StdpState {
    /// Cria o estado STDP para `num_synapses` sinapses com o passo `dt` da
    /// rede. A configuração deve já ter sido validada.
    pub fn new(num_synapses: usize, config: StdpConfig, dt: f64) -> Result<Self, String> {
        config.validate()?;
        Ok(Self {
            decay_pre: (-dt / config.tau_pre).exp(),
            decay_post: (-dt / config.tau_post).exp(),
            apre: vec![0.0; num_synapses],
            apost: vec![0.0; num_synapses],
            config,
        })
    }

    /// Configuração da regra
    pub fn config(&self) -> &StdpConfig {
        &self.config
    }

    /// Traço pré da sinapse `syn`
    pub fn apre(&self, syn: usize) -> f64 {
        self.apre[syn]
    }

    /// Traço pós da sinapse `syn`
    pub fn apost(&self, syn: usize) -> f64 {
        self.apost[syn]
    }

    /// Ramo de disparo pré-sináptico da sinapse `syn`.
    ///
    /// O chamador já entregou `w` ao alvo; aqui o traço pré é incrementado e
    /// o peso é atualizado pelo traço pós, com clipping incondicional.
    pub(crate) fn on_pre(&mut self, syn: usize, w: &mut f64) {
        self.apre[syn] += self.config.a_pre;
        *w = (*w + self.apost[syn]).clamp(0.0, self.config.w_max);
        debug_assert!(
            w.is_nan() || (*w >= 0.0 && *w <= self.config.w_max),
            "peso fora de [0, w_max] após evento pré"
        );
    }

    /// Ramo de disparo pós-sináptico da sinapse `syn`.
    pub(crate) fn on_post(&mut self, syn: usize, w: &mut f64) {
        self.apost[syn] += self.config.a_post;
        *w = (*w + self.apre[syn]).clamp(0.0, self.config.w_max);
        debug_assert!(
            w.is_nan() || (*w >= 0.0 && *w <= self.config.w_max),
            "peso fora de [0, w_max] após evento pós"
        );
    }

    /// Decaimento exponencial de todos os traços, uma vez por passo.
    pub(crate) fn decay(&mut self) {
        for a in &mut self.apre {
            *a *= self.decay_pre;
        }
        for a in &mut self.apost {
            *a *= self.decay_post;
        }
    }

    /// Verifica que traços e pesos continuam finitos.
    ///
    /// Valores não finitos indicam erro de modelagem a montante e são
    /// tratados como violação fatal de invariante, não silenciosamente
    /// saturados.
    pub(crate) fn check_finite(&self, weights: &[f64]) -> Result<(), String> {
        for (syn, w) in weights.iter().enumerate() {
            if !w.is_finite() {
                return Err(format!("peso não finito na sinapse {}: {}", syn, w));
            }
        }
        for (syn, a) in self.apre.iter().enumerate() {
            if !a.is_finite() {
                return Err(format!("traço pré não finito na sinapse {}: {}", syn, a));
            }
        }
        for (syn, a) in self.apost.iter().enumerate() {
            if !a.is_finite() {
                return Err(format!("traço pós não finito na sinapse {}: {}", syn, a));
            }
        }
        Ok(())
    }
}
