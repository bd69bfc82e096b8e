//! # População de Neurônios LIF
//!
//! Grupo homogêneo de N neurônios Leaky Integrate-and-Fire. A cada passo a
//! população integra o potencial de membrana de cada neurônio, detecta
//! cruzamentos de limiar e aplica reset + período refratário.
//!
//! ## Modelo
//!
//! `dv/dt = (I - v) / tau`, com disparo quando `v > threshold`, reset para
//! `reset` e bloqueio refratário de `refractory` ms. O integrador padrão é o
//! **exponencial exato** - como a EDO é linear e `tau` é fixo por neurônio,
//! `v(t+dt) = I + (v - I) * exp(-dt/tau)` elimina o erro dependente do passo
//! que o método de Euler introduz.
//!
//! ## Contrato de ordenação
//!
//! A detecção de disparo acontece estritamente **depois** da integração do
//! mesmo passo. Neurônios em período refratário não integram e não podem
//! disparar; entregas sinápticas, porém, continuam sendo acumuladas em `v`
//! (apenas a EDO fica suspensa, como no modelo original).
//!
//! A contagem refratária é mantida em passos inteiros, como o relógio da
//! rede: subtrações repetidas de `dt` em ponto flutuante deixariam resíduo
//! e esticariam o bloqueio em um passo extra.

use crate::constants::{neuron, timing};

/// Método de integração numérica da membrana.
///
/// Variante explícita e tipada no lugar de strings de equação: o passo de
/// integração fica inspecionável e testável sem geração de código.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntegrationMethod {
    /// Solução exata da EDO linear (preferido)
    #[default]
    Exact,
    /// Euler explícito (disponível para comparação numérica)
    Euler,
}

/// Configuração de uma população LIF
#[derive(Debug, Clone)]
pub struct LifConfig {
    /// Constante de tempo da membrana (ms), > 0
    pub tau: f64,

    /// Limiar de disparo: o neurônio dispara quando `v > threshold`
    pub threshold: f64,

    /// Potencial após o disparo
    pub reset: f64,

    /// Duração do período refratário (ms), >= 0
    pub refractory: f64,

    /// Método de integração
    pub method: IntegrationMethod,
}

impl Default for LifConfig {
    fn default() -> Self {
        Self {
            tau: timing::MEMBRANE_TAU,
            threshold: neuron::THRESHOLD,
            reset: neuron::RESET,
            refractory: timing::REFRACTORY_PERIOD,
            method: IntegrationMethod::Exact,
        }
    }
}

impl LifConfig {
    /// Valida a configuração antes de criar a população
    pub fn validate(&self) -> Result<(), String> {
        if !self.tau.is_finite() || self.tau <= 0.0 {
            return Err(format!("tau de membrana inválido: {}", self.tau));
        }
        if !self.refractory.is_finite() || self.refractory < 0.0 {
            return Err(format!("período refratário inválido: {}", self.refractory));
        }
        if !self.threshold.is_finite() || !self.reset.is_finite() {
            return Err("threshold e reset devem ser finitos".to_string());
        }
        Ok(())
    }
}

/// População homogênea de neurônios LIF
#[derive(Debug, Clone)]
pub struct NeuronPopulation {
    config: LifConfig,

    /// Potencial de membrana por neurônio
    v: Vec<f64>,

    /// Corrente de entrada constante (drive) por neurônio
    drive: Vec<f64>,

    /// Constante de tempo por neurônio (ms)
    tau: Vec<f64>,

    /// Fator de decaimento exato `exp(-dt/tau)` por neurônio
    decay: Vec<f64>,

    /// Contagem regressiva refratária por neurônio, em passos inteiros
    refractory_steps: Vec<u64>,

    /// Duração do bloqueio refratário em passos: `ceil(refractory / dt)`
    lockout_steps: u64,

    /// Passo de integração da rede dona desta população (ms)
    dt: f64,
}

impl NeuronPopulation {
    /// Cria uma população de `n` neurônios com o passo `dt` da rede.
    ///
    /// O tamanho é fixo após a criação; a população nunca é redimensionada.
    pub fn new(n: usize, config: LifConfig, dt: f64) -> Result<Self, String> {
        if n == 0 {
            return Err("população precisa de pelo menos um neurônio".to_string());
        }
        config.validate()?;

        let decay = (-dt / config.tau).exp();
        Ok(Self {
            v: vec![config.reset; n],
            drive: vec![0.0; n],
            tau: vec![config.tau; n],
            decay: vec![decay; n],
            refractory_steps: vec![0; n],
            lockout_steps: (config.refractory / dt).ceil() as u64,
            dt,
            config,
        })
    }

    /// Número de neurônios
    pub fn len(&self) -> usize {
        self.v.len()
    }

    /// Verifica se a população está vazia (nunca, por construção)
    pub fn is_empty(&self) -> bool {
        self.v.is_empty()
    }

    /// Configuração da população
    pub fn config(&self) -> &LifConfig {
        &self.config
    }

    /// Potencial de membrana do neurônio `i`
    pub fn potential(&self, i: usize) -> f64 {
        self.v[i]
    }

    /// Drive constante do neurônio `i`
    pub fn drive(&self, i: usize) -> f64 {
        self.drive[i]
    }

    /// Tempo refratário restante do neurônio `i` (ms)
    pub fn refractory_left(&self, i: usize) -> f64 {
        self.refractory_steps[i] as f64 * self.dt
    }

    /// Vetor completo de potenciais
    pub fn potentials(&self) -> &[f64] {
        &self.v
    }

    /// Define o drive constante de um neurônio
    pub fn set_drive(&mut self, i: usize, value: f64) -> Result<(), String> {
        if i >= self.len() {
            return Err(format!("índice {} fora da população de {}", i, self.len()));
        }
        if !value.is_finite() {
            return Err(format!("drive não finito: {}", value));
        }
        self.drive[i] = value;
        Ok(())
    }

    /// Define o drive de toda a população
    pub fn set_drive_all(&mut self, values: &[f64]) -> Result<(), String> {
        if values.len() != self.len() {
            return Err(format!(
                "drive com {} valores para população de {}",
                values.len(),
                self.len()
            ));
        }
        for (i, &value) in values.iter().enumerate() {
            self.set_drive(i, value)?;
        }
        Ok(())
    }

    /// Redefine a constante de tempo de um neurônio, recalculando o fator
    /// de decaimento exato.
    pub fn set_tau(&mut self, i: usize, tau: f64) -> Result<(), String> {
        if i >= self.len() {
            return Err(format!("índice {} fora da população de {}", i, self.len()));
        }
        if !tau.is_finite() || tau <= 0.0 {
            return Err(format!("tau inválido: {}", tau));
        }
        self.tau[i] = tau;
        self.decay[i] = (-self.dt / tau).exp();
        Ok(())
    }

    /// Incremento sináptico instantâneo no potencial do neurônio `i`.
    ///
    /// Aplicado mesmo durante o período refratário: apenas a integração da
    /// EDO fica suspensa, não a chegada de eventos.
    pub(crate) fn kick_potential(&mut self, i: usize, w: f64) {
        self.v[i] += w;
    }

    /// Incremento sináptico no drive do neurônio `i` (persistente)
    pub(crate) fn kick_drive(&mut self, i: usize, w: f64) {
        self.drive[i] += w;
    }

    /// Executa um passo de integração e retorna os índices que dispararam.
    ///
    /// Ordem por neurônio: (1) se refratário, decrementa a contagem e pula;
    /// (2) integra; (3) verifica o limiar; (4) em caso de disparo, reset +
    /// início do período refratário.
    pub(crate) fn step(&mut self) -> Vec<usize> {
        let mut fired = Vec::new();

        for i in 0..self.v.len() {
            if self.refractory_steps[i] > 0 {
                self.refractory_steps[i] -= 1;
                continue;
            }

            match self.config.method {
                IntegrationMethod::Exact => {
                    self.v[i] = self.drive[i] + (self.v[i] - self.drive[i]) * self.decay[i];
                }
                IntegrationMethod::Euler => {
                    self.v[i] += (self.drive[i] - self.v[i]) / self.tau[i] * self.dt;
                }
            }

            if self.v[i] > self.config.threshold {
                debug_assert!(
                    self.refractory_steps[i] == 0,
                    "disparo de neurônio ainda refratário"
                );
                fired.push(i);
                self.v[i] = self.config.reset;
                self.refractory_steps[i] = self.lockout_steps;
            }
        }

        fired
    }

    /// Verifica que potenciais e drives continuam finitos.
    ///
    /// Chamado pela rede ao final de cada passo: entregas sinápticas podem
    /// estourar `v` ou `I` para infinito sem que nenhum invariante local da
    /// população seja violado.
    pub(crate) fn check_finite(&self) -> Result<(), String> {
        for (i, v) in self.v.iter().enumerate() {
            if !v.is_finite() {
                return Err(format!("potencial não finito no neurônio {}: {}", i, v));
            }
        }
        for (i, d) in self.drive.iter().enumerate() {
            if !d.is_finite() {
                return Err(format!("drive não finito no neurônio {}: {}", i, d));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_config_validation() {
        let mut config = LifConfig::default();
        assert!(config.validate().is_ok());

        config.tau = 0.0;
        assert!(config.validate().is_err());

        config.tau = 10.0;
        config.refractory = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_exact_integration_converges_to_drive() {
        let mut pop = NeuronPopulation::new(
            1,
            LifConfig {
                threshold: 10.0, // alto o bastante para nunca disparar
                ..LifConfig::default()
            },
            0.1,
        )
        .unwrap();
        pop.set_drive(0, 0.5).unwrap();

        // 100ms = 10 * tau: o potencial deve ter convergido para o drive
        for _ in 0..1000 {
            pop.step();
        }

        assert_relative_eq!(pop.potential(0), 0.5, epsilon = 1e-4);
    }

    #[test]
    fn test_exact_matches_closed_form_charging() {
        let tau = 10.0;
        let dt = 0.1;
        let mut pop = NeuronPopulation::new(
            1,
            LifConfig {
                tau,
                threshold: 10.0,
                ..LifConfig::default()
            },
            dt,
        )
        .unwrap();
        pop.set_drive(0, 1.0).unwrap();

        // 50 passos = 5ms de carga a partir de v = 0
        for _ in 0..50 {
            pop.step();
        }

        let expected = 1.0 - (-5.0_f64 / tau).exp();
        assert_relative_eq!(pop.potential(0), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_spike_resets_and_locks_refractory() {
        let mut pop = NeuronPopulation::new(1, LifConfig::default(), 0.1).unwrap();
        pop.set_drive(0, 2.0).unwrap();

        let mut first_spike = None;
        for step in 0..1000 {
            let fired = pop.step();
            if !fired.is_empty() {
                first_spike = Some(step);
                break;
            }
        }

        let step = first_spike.expect("drive de 2.0 deveria disparar");
        assert_relative_eq!(pop.potential(0), 0.0);
        assert_relative_eq!(pop.refractory_left(0), 5.0);

        // Durante 50 passos (5ms) o neurônio não pode disparar de novo
        for _ in 0..50 {
            let fired = pop.step();
            assert!(fired.is_empty());
        }
        let _ = step;
    }

    #[test]
    fn test_lockout_lasts_exact_step_count() {
        // Drive alto: um único passo de integração cruza o limiar, então o
        // intervalo entre disparos é exatamente refractory/dt + 1 passos.
        // Pega regressões de resíduo de ponto flutuante na contagem.
        let mut pop = NeuronPopulation::new(
            1,
            LifConfig {
                refractory: 5.0,
                ..LifConfig::default()
            },
            0.1,
        )
        .unwrap();
        pop.set_drive(0, 200.0).unwrap();

        let mut fired_at = Vec::new();
        for step in 0..300u64 {
            if !pop.step().is_empty() {
                fired_at.push(step);
            }
        }

        assert!(fired_at.len() >= 4);
        for pair in fired_at.windows(2) {
            assert_eq!(pair[1] - pair[0], 51);
        }
    }

    #[test]
    fn test_check_finite_flags_overflowed_potential() {
        let mut pop = NeuronPopulation::new(2, LifConfig::default(), 0.1).unwrap();
        assert!(pop.check_finite().is_ok());

        pop.kick_potential(0, -1.0e308);
        pop.kick_potential(0, -1.0e308);
        assert!(pop.check_finite().is_err());
    }

    #[test]
    fn test_refractory_neuron_does_not_integrate() {
        let mut pop = NeuronPopulation::new(1, LifConfig::default(), 0.1).unwrap();
        pop.set_drive(0, 2.0).unwrap();

        // Dispara
        while pop.step().is_empty() {}

        // Em refratário: o potencial fica congelado no reset
        pop.step();
        assert_relative_eq!(pop.potential(0), 0.0);
    }

    #[test]
    fn test_kick_applies_during_refractory() {
        let mut pop = NeuronPopulation::new(1, LifConfig::default(), 0.1).unwrap();
        pop.set_drive(0, 2.0).unwrap();
        while pop.step().is_empty() {}

        pop.kick_potential(0, 0.3);
        assert_relative_eq!(pop.potential(0), 0.3);

        // Mesmo acima do limiar o neurônio refratário não dispara
        pop.kick_potential(0, 1.0);
        let fired = pop.step();
        assert!(fired.is_empty());
    }

    #[test]
    fn test_euler_approximates_exact() {
        let make = |method| {
            let mut pop = NeuronPopulation::new(
                1,
                LifConfig {
                    threshold: 10.0,
                    method,
                    ..LifConfig::default()
                },
                0.01,
            )
            .unwrap();
            pop.set_drive(0, 1.0).unwrap();
            for _ in 0..1000 {
                pop.step();
            }
            pop.potential(0)
        };

        let exact = make(IntegrationMethod::Exact);
        let euler = make(IntegrationMethod::Euler);
        assert_relative_eq!(exact, euler, epsilon = 1e-3);
    }
}
