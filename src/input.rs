//! # Fontes de Entrada
//!
//! Qualquer componente que exponha, por passo, "quais índices dispararam"
//! serve como fonte de uma projeção - esse é o contrato [`InputSource`].
//!
//! ## Implementações
//!
//! - [`SpikeGenerator`]: lista determinística de disparos `(índice, tempo)`
//! - [`PoissonSource`]: gerador taxa → processo de Poisson, um neurônio por
//!   taxa, com RNG semeado para reprodutibilidade bit a bit
//!
//! Fontes são consumidas pela [`Network`](crate::network::Network), que as
//! consulta uma vez por passo na mesma fase em que integra as populações.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Contrato de fonte de entrada: emite índices que dispararam no passo.
pub trait InputSource {
    /// Número de índices da fonte
    fn len(&self) -> usize;

    /// Verdadeiro se a fonte não tem índices
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Gera os disparos do próximo passo de duração `dt` (ms).
    ///
    /// A fonte mantém sua própria noção de tempo decorrido; chamadas
    /// sucessivas cobrem janelas consecutivas `[t, t+dt)`.
    fn generate(&mut self, dt: f64) -> Vec<usize>;

    /// Redefine as taxas de disparo (Hz), para fontes baseadas em taxa.
    ///
    /// Parte do contrato de gerador taxa → Poisson; fontes determinísticas
    /// não aceitam taxas.
    fn set_rates(&mut self, _rates: &[f64]) -> Result<(), String> {
        Err("esta fonte de entrada não é baseada em taxas".to_string())
    }
}

/// Fonte determinística: dispara exatamente nos tempos fornecidos.
///
/// Cada disparo `(índice, tempo)` é emitido no passo cuja janela
/// `[t, t+dt)` contém o tempo. Os disparos são ordenados por tempo na
/// construção.
#[derive(Debug, Clone)]
pub struct SpikeGenerator {
    n: usize,

    /// Disparos `(índice, tempo em ms)` ordenados por tempo
    spikes: Vec<(usize, f64)>,

    /// Posição do próximo disparo ainda não emitido
    cursor: usize,

    /// Passos já gerados
    steps: u64,
}

impl SpikeGenerator {
    /// Cria um gerador com `n` índices e a lista de disparos dada.
    pub fn new(n: usize, mut spikes: Vec<(usize, f64)>) -> Result<Self, String> {
        if n == 0 {
            return Err("gerador precisa de pelo menos um índice".to_string());
        }
        for &(idx, t) in &spikes {
            if idx >= n {
                return Err(format!("índice de disparo {} fora do gerador de {}", idx, n));
            }
            if !t.is_finite() || t < 0.0 {
                return Err(format!("tempo de disparo inválido: {}", t));
            }
        }
        spikes.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap());
        Ok(Self {
            n,
            spikes,
            cursor: 0,
            steps: 0,
        })
    }
}

impl InputSource for SpikeGenerator {
    fn len(&self) -> usize {
        self.n
    }

    fn generate(&mut self, dt: f64) -> Vec<usize> {
        let window_end = (self.steps + 1) as f64 * dt;
        self.steps += 1;

        let mut fired = Vec::new();
        while self.cursor < self.spikes.len() && self.spikes[self.cursor].1 < window_end {
            fired.push(self.spikes[self.cursor].0);
            self.cursor += 1;
        }
        fired
    }
}

/// Gerador taxa → processo de Poisson.
///
/// Consome um vetor de taxas não negativas (Hz), uma por índice, e emite
/// disparos com intervalo esperado `1/taxa` via aproximação de Bernoulli por
/// passo (`p = taxa * dt / 1000`). Taxa 0 nunca dispara.
///
/// Determinismo: o RNG é um `StdRng` criado da semente dada; com a mesma
/// semente e a mesma sequência de passos, o trem de disparos é idêntico
/// bit a bit.
#[derive(Debug, Clone)]
pub struct PoissonSource {
    rates: Vec<f64>,
    rng: StdRng,
}

impl PoissonSource {
    /// Cria a fonte com as taxas (Hz) e a semente dadas.
    pub fn new(rates: Vec<f64>, seed: u64) -> Result<Self, String> {
        Self::validate_rates(&rates)?;
        Ok(Self {
            rates,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// Fonte silenciosa (todas as taxas em zero)
    pub fn silent(n: usize, seed: u64) -> Result<Self, String> {
        Self::new(vec![0.0; n], seed)
    }

    /// Taxas atuais (Hz)
    pub fn rates(&self) -> &[f64] {
        &self.rates
    }

    fn validate_rates(rates: &[f64]) -> Result<(), String> {
        if rates.is_empty() {
            return Err("vetor de taxas vazio".to_string());
        }
        for (i, &r) in rates.iter().enumerate() {
            if !r.is_finite() || r < 0.0 {
                return Err(format!("taxa inválida no índice {}: {}", i, r));
            }
        }
        Ok(())
    }
}

impl InputSource for PoissonSource {
    fn len(&self) -> usize {
        self.rates.len()
    }

    fn generate(&mut self, dt: f64) -> Vec<usize> {
        let mut fired = Vec::new();
        for (i, &rate) in self.rates.iter().enumerate() {
            // Hz * ms -> probabilidade por passo
            let p = rate * dt * 1e-3;
            if p > 0.0 && self.rng.gen::<f64>() < p {
                fired.push(i);
            }
        }
        fired
    }

    fn set_rates(&mut self, rates: &[f64]) -> Result<(), String> {
        if rates.len() != self.rates.len() {
            return Err(format!(
                "novas taxas com {} valores para fonte de {}",
                rates.len(),
                self.rates.len()
            ));
        }
        Self::validate_rates(rates)?;
        self.rates.copy_from_slice(rates);
        Ok(())
    }
}
