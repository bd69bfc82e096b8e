//! # Monitores
//!
//! Observadores passivos do estado da rede, amostrados ao final de cada
//! passo. Monitores nunca mutam o estado observado - a amostragem recebe
//! apenas referências imutáveis.
//!
//! ## Tipos
//!
//! - [`SpikeMonitor`]: registra `(tempo, índice)` de cada disparo de uma
//!   população ou fonte de entrada observada
//! - [`StateMonitor`]: amostra por passo uma variável de população
//!   (potencial, drive, refratário) em um subconjunto de índices
//! - [`WeightMonitor`]: amostra por passo os pesos de sinapses escolhidas de
//!   uma projeção

use crate::network::{PopulationId, ProjectionId, SourceRef};
use crate::population::NeuronPopulation;
use crate::projection::Projection;

/// Variável de população registrável por um [`StateMonitor`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordVariable {
    /// Potencial de membrana `v`
    Potential,
    /// Corrente de entrada constante `I`
    Drive,
    /// Contagem regressiva refratária `r`
    Refractory,
}

/// Monitor de disparos de uma fonte (população ou gerador de entrada)
#[derive(Debug, Clone)]
pub struct SpikeMonitor {
    source: SourceRef,

    /// Eventos `(tempo em ms, índice)` na ordem de emissão
    events: Vec<(f64, usize)>,
}

impl SpikeMonitor {
    pub(crate) fn new(source: SourceRef) -> Self {
        Self {
            source,
            events: Vec::new(),
        }
    }

    pub(crate) fn record(&mut self, time: f64, indices: &[usize]) {
        for &i in indices {
            self.events.push((time, i));
        }
    }

    /// Fonte observada
    pub fn source(&self) -> SourceRef {
        self.source
    }

    /// Todos os eventos registrados
    pub fn events(&self) -> &[(f64, usize)] {
        &self.events
    }

    /// Número total de disparos
    pub fn count(&self) -> usize {
        self.events.len()
    }

    /// Número de disparos do índice `i`
    pub fn count_for(&self, i: usize) -> usize {
        self.events.iter().filter(|&&(_, idx)| idx == i).count()
    }

    /// Tempos de disparo do índice `i`, em ordem
    pub fn times_for(&self, i: usize) -> Vec<f64> {
        self.events
            .iter()
            .filter(|&&(_, idx)| idx == i)
            .map(|&(t, _)| t)
            .collect()
    }

    /// Número de disparos na janela `[t0, t1)`
    pub fn count_in_window(&self, t0: f64, t1: f64) -> usize {
        self.events
            .iter()
            .filter(|&&(t, _)| t >= t0 && t < t1)
            .count()
    }

    /// Número de disparos na janela `[t0, t1)` cujo índice cai na faixa dada
    pub fn count_in_window_for(&self, t0: f64, t1: f64, indices: std::ops::Range<usize>) -> usize {
        self.events
            .iter()
            .filter(|&&(t, idx)| t >= t0 && t < t1 && indices.contains(&idx))
            .count()
    }
}

/// Monitor de uma variável de população em índices escolhidos
#[derive(Debug, Clone)]
pub struct StateMonitor {
    population: PopulationId,
    variable: RecordVariable,
    indices: Vec<usize>,

    times: Vec<f64>,

    /// Uma série por índice observado, alinhada com `times`
    series: Vec<Vec<f64>>,
}

impl StateMonitor {
    pub(crate) fn new(
        population: PopulationId,
        variable: RecordVariable,
        indices: Vec<usize>,
    ) -> Self {
        let series = vec![Vec::new(); indices.len()];
        Self {
            population,
            variable,
            indices,
            times: Vec::new(),
            series,
        }
    }

    pub(crate) fn sample(&mut self, time: f64, pop: &NeuronPopulation) {
        self.times.push(time);
        for (k, &i) in self.indices.iter().enumerate() {
            let value = match self.variable {
                RecordVariable::Potential => pop.potential(i),
                RecordVariable::Drive => pop.drive(i),
                RecordVariable::Refractory => pop.refractory_left(i),
            };
            self.series[k].push(value);
        }
    }

    /// População observada
    pub fn population(&self) -> PopulationId {
        self.population
    }

    /// Variável registrada
    pub fn variable(&self) -> RecordVariable {
        self.variable
    }

    /// Índices observados
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Eixo de tempo das amostras (ms)
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Série temporal do `k`-ésimo índice observado
    pub fn series(&self, k: usize) -> &[f64] {
        &self.series[k]
    }
}

/// Monitor de pesos de sinapses escolhidas de uma projeção
#[derive(Debug, Clone)]
pub struct WeightMonitor {
    projection: ProjectionId,
    synapses: Vec<usize>,

    times: Vec<f64>,
    series: Vec<Vec<f64>>,
}

impl WeightMonitor {
    pub(crate) fn new(projection: ProjectionId, synapses: Vec<usize>) -> Self {
        let series = vec![Vec::new(); synapses.len()];
        Self {
            projection,
            synapses,
            times: Vec::new(),
            series,
        }
    }

    pub(crate) fn sample(&mut self, time: f64, proj: &Projection) {
        self.times.push(time);
        let weights = proj.weights();
        for (k, &syn) in self.synapses.iter().enumerate() {
            self.series[k].push(weights[syn]);
        }
    }

    /// Projeção observada
    pub fn projection(&self) -> ProjectionId {
        self.projection
    }

    /// Sinapses observadas
    pub fn synapses(&self) -> &[usize] {
        &self.synapses
    }

    /// Eixo de tempo das amostras (ms)
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Série temporal do peso da `k`-ésima sinapse observada
    pub fn series(&self, k: usize) -> &[f64] {
        &self.series[k]
    }

    /// Menor peso já amostrado, sobre todas as sinapses observadas
    pub fn min_recorded(&self) -> f64 {
        self.series
            .iter()
            .flatten()
            .copied()
            .fold(f64::INFINITY, f64::min)
    }

    /// Maior peso já amostrado, sobre todas as sinapses observadas
    pub fn max_recorded(&self) -> f64 {
        self.series
            .iter()
            .flatten()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }
}
