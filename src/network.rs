//! # Rede e Laço de Simulação
//!
//! A [`Network`] é o contêiner de execução: dona do relógio, das populações,
//! das fontes de entrada, das projeções e dos monitores. Não existe estado
//! global de simulação - todo componente pertence explicitamente a uma rede,
//! e exatamente um laço dirige uma rede por vez.
//!
//! ## Ordem do passo
//!
//! Cada passo discreto executa, em ordem fixa:
//!
//! 1. Avança o relógio
//! 2. Consulta as fontes de entrada e integra todas as populações,
//!    coletando as listas de disparos (populações independentes não
//!    interagem dentro do passo: projeções só enxergam disparos já coletados)
//! 3. Entrega os disparos por todas as projeções (ramo pré e, para as
//!    plásticas, ramo pós do STDP)
//! 4. Decai os traços de plasticidade e verifica finitude de pesos, traços,
//!    potenciais e drives
//! 5. Alimenta os monitores
//!
//! Essa ordem garante causalidade: uma atualização de peso nunca usa
//! informação de um passo futuro. O passo é atômico - ou completa inteiro,
//! ou o erro é devolvido com o estado no último limite de passo concluído.
//!
//! ## Execução fragmentada
//!
//! `run(duration)` é reentrante: duas chamadas consecutivas produzem estado
//! idêntico a uma única chamada com a duração somada (potenciais, traços,
//! pesos e relógio persistem). [`Network::step`] é público para quem precisa
//! de cancelamento entre passos.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::clock::Clock;
use crate::input::InputSource;
use crate::monitors::{RecordVariable, SpikeMonitor, StateMonitor, WeightMonitor};
use crate::population::{LifConfig, NeuronPopulation};
use crate::projection::{Projection, ProjectionSpec, WeightInit};

/// Identificador de uma população dentro de uma rede.
///
/// Identificadores são emitidos pelos métodos de construção da [`Network`] e
/// só são válidos na rede que os emitiu - o índice interno não é construível
/// fora da biblioteca.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PopulationId(pub(crate) usize);

/// Identificador de uma fonte de entrada dentro de uma rede
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InputId(pub(crate) usize);

/// Identificador de uma projeção dentro de uma rede
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProjectionId(pub(crate) usize);

/// Identificador de um monitor de disparos
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpikeMonitorId(pub(crate) usize);

/// Identificador de um monitor de estado
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateMonitorId(pub(crate) usize);

/// Identificador de um monitor de pesos
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WeightMonitorId(pub(crate) usize);

/// Fonte de uma projeção: população ou gerador de entrada
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceRef {
    Population(PopulationId),
    Input(InputId),
}

/// Estado de execução da rede
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkState {
    /// Construída, nenhum `run` emitido ainda
    Idle,
    /// Pelo menos um `run` emitido
    Running,
}

/// Contêiner de execução da simulação
pub struct Network {
    clock: Clock,

    /// RNG semeado usado na inicialização de pesos uniformes
    rng: StdRng,

    populations: Vec<NeuronPopulation>,
    inputs: Vec<Box<dyn InputSource>>,
    projections: Vec<Projection>,

    spike_monitors: Vec<SpikeMonitor>,
    state_monitors: Vec<StateMonitor>,
    weight_monitors: Vec<WeightMonitor>,

    state: NetworkState,
}

impl Network {
    /// Cria uma rede vazia com o passo `dt` (ms) e a semente dada.
    pub fn new(dt: f64, seed: u64) -> Result<Self, String> {
        Ok(Self {
            clock: Clock::new(dt)?,
            rng: StdRng::seed_from_u64(seed),
            populations: Vec::new(),
            inputs: Vec::new(),
            projections: Vec::new(),
            spike_monitors: Vec::new(),
            state_monitors: Vec::new(),
            weight_monitors: Vec::new(),
            state: NetworkState::Idle,
        })
    }

    /// Rede com o passo padrão de [`constants::timing::DT`](crate::constants::timing::DT)
    pub fn with_defaults(seed: u64) -> Self {
        Self::new(crate::constants::timing::DT, seed).expect("DT padrão é válido")
    }

    // ========================================================================
    // CONSTRUÇÃO
    // ========================================================================

    /// Adiciona uma população de `n` neurônios LIF
    pub fn add_population(&mut self, n: usize, config: LifConfig) -> Result<PopulationId, String> {
        let pop = NeuronPopulation::new(n, config, self.clock.dt())?;
        self.populations.push(pop);
        Ok(PopulationId(self.populations.len() - 1))
    }

    /// Adiciona uma fonte de entrada
    pub fn add_input(&mut self, source: Box<dyn InputSource>) -> Result<InputId, String> {
        if source.is_empty() {
            return Err("fonte de entrada vazia".to_string());
        }
        self.inputs.push(source);
        Ok(InputId(self.inputs.len() - 1))
    }

    /// Conecta uma fonte a uma população alvo segundo a especificação.
    ///
    /// A conectividade é imutável após esta chamada; apenas os pesos mudam,
    /// e somente em projeções plásticas.
    pub fn connect(
        &mut self,
        source: SourceRef,
        target: PopulationId,
        spec: ProjectionSpec,
    ) -> Result<ProjectionId, String> {
        let n_source = self.source_len(source)?;
        let n_target = self
            .populations
            .get(target.0)
            .ok_or_else(|| format!("população alvo inexistente: {:?}", target))?
            .len();

        let mut proj = Projection::new(
            source,
            target,
            n_source,
            n_target,
            &spec.connectivity,
            spec.delivery,
            spec.delay_steps,
        )?;

        let num_synapses = proj.num_synapses();
        let bound = spec.plasticity.as_ref().map(|cfg| cfg.w_max);
        let weights = self.draw_weights(num_synapses, spec.init, bound)?;
        proj.set_weights(weights);

        if let Some(cfg) = spec.plasticity {
            let stdp = crate::plasticity::StdpState::new(num_synapses, cfg, self.clock.dt())?;
            proj.attach_stdp(stdp);
        }

        self.projections.push(proj);
        Ok(ProjectionId(self.projections.len() - 1))
    }

    /// Sorteia ou replica os pesos iniciais, validando os limites de
    /// projeções plásticas (`[0, w_max]` vale desde a construção).
    fn draw_weights(
        &mut self,
        n: usize,
        init: WeightInit,
        plastic_bound: Option<f64>,
    ) -> Result<Vec<f64>, String> {
        let check = |w: f64| -> Result<(), String> {
            if !w.is_finite() {
                return Err(format!("peso inicial não finito: {}", w));
            }
            if let Some(w_max) = plastic_bound {
                if w < 0.0 || w > w_max {
                    return Err(format!(
                        "peso inicial {} fora de [0, {}] em projeção plástica",
                        w, w_max
                    ));
                }
            }
            Ok(())
        };

        match init {
            WeightInit::Constant(w) => {
                check(w)?;
                Ok(vec![w; n])
            }
            WeightInit::Uniform { lo, hi } => {
                if !(lo.is_finite() && hi.is_finite()) || lo > hi {
                    return Err(format!("faixa de pesos inválida: [{}, {})", lo, hi));
                }
                check(lo)?;
                check(hi)?;
                if lo == hi {
                    return Ok(vec![lo; n]);
                }
                Ok((0..n).map(|_| self.rng.gen_range(lo..hi)).collect())
            }
        }
    }

    fn source_len(&self, source: SourceRef) -> Result<usize, String> {
        match source {
            SourceRef::Population(p) => self
                .populations
                .get(p.0)
                .map(|pop| pop.len())
                .ok_or_else(|| format!("população fonte inexistente: {:?}", p)),
            SourceRef::Input(i) => self
                .inputs
                .get(i.0)
                .map(|input| input.len())
                .ok_or_else(|| format!("fonte de entrada inexistente: {:?}", i)),
        }
    }

    // ========================================================================
    // MONITORES
    // ========================================================================

    /// Anexa um monitor de disparos à fonte dada
    pub fn monitor_spikes(&mut self, source: SourceRef) -> Result<SpikeMonitorId, String> {
        self.source_len(source)?;
        self.spike_monitors.push(SpikeMonitor::new(source));
        Ok(SpikeMonitorId(self.spike_monitors.len() - 1))
    }

    /// Anexa um monitor de estado a índices de uma população
    pub fn monitor_state(
        &mut self,
        population: PopulationId,
        variable: RecordVariable,
        indices: Vec<usize>,
    ) -> Result<StateMonitorId, String> {
        let n = self
            .populations
            .get(population.0)
            .ok_or_else(|| format!("população inexistente: {:?}", population))?
            .len();
        for &i in &indices {
            if i >= n {
                return Err(format!("índice monitorado {} fora da população de {}", i, n));
            }
        }
        self.state_monitors
            .push(StateMonitor::new(population, variable, indices));
        Ok(StateMonitorId(self.state_monitors.len() - 1))
    }

    /// Anexa um monitor de pesos a sinapses de uma projeção
    pub fn monitor_weights(
        &mut self,
        projection: ProjectionId,
        synapses: Vec<usize>,
    ) -> Result<WeightMonitorId, String> {
        let n = self
            .projections
            .get(projection.0)
            .ok_or_else(|| format!("projeção inexistente: {:?}", projection))?
            .num_synapses();
        for &syn in &synapses {
            if syn >= n {
                return Err(format!("sinapse monitorada {} fora da projeção de {}", syn, n));
            }
        }
        self.weight_monitors
            .push(WeightMonitor::new(projection, synapses));
        Ok(WeightMonitorId(self.weight_monitors.len() - 1))
    }

    /// Acessa um monitor de disparos
    pub fn spikes(&self, id: SpikeMonitorId) -> &SpikeMonitor {
        &self.spike_monitors[id.0]
    }

    /// Acessa um monitor de estado
    pub fn states(&self, id: StateMonitorId) -> &StateMonitor {
        &self.state_monitors[id.0]
    }

    /// Acessa um monitor de pesos
    pub fn weights(&self, id: WeightMonitorId) -> &WeightMonitor {
        &self.weight_monitors[id.0]
    }

    // ========================================================================
    // ACESSO A COMPONENTES
    // ========================================================================

    /// Passo de integração (ms)
    pub fn dt(&self) -> f64 {
        self.clock.dt()
    }

    /// Tempo corrente (ms)
    pub fn time(&self) -> f64 {
        self.clock.now()
    }

    /// Número de passos executados
    pub fn steps(&self) -> u64 {
        self.clock.steps()
    }

    /// Estado de execução
    pub fn state(&self) -> NetworkState {
        self.state
    }

    /// Acessa uma população
    pub fn population(&self, id: PopulationId) -> &NeuronPopulation {
        &self.populations[id.0]
    }

    /// Acessa uma população mutavelmente (para configurar drive, tau, etc.)
    pub fn population_mut(&mut self, id: PopulationId) -> &mut NeuronPopulation {
        &mut self.populations[id.0]
    }

    /// Acessa uma projeção
    pub fn projection(&self, id: ProjectionId) -> &Projection {
        &self.projections[id.0]
    }

    /// Redefine as taxas (Hz) de uma fonte de entrada baseada em taxa
    pub fn set_input_rates(&mut self, id: InputId, rates: &[f64]) -> Result<(), String> {
        self.inputs
            .get_mut(id.0)
            .ok_or_else(|| format!("fonte de entrada inexistente: {:?}", id))?
            .set_rates(rates)
    }

    // ========================================================================
    // LAÇO DE SIMULAÇÃO
    // ========================================================================

    /// Executa um único passo discreto.
    ///
    /// Público para permitir cancelamento dirigido pelo chamador: a rede
    /// permanece retomável em qualquer limite de passo.
    pub fn step(&mut self) -> Result<(), String> {
        // (1) relógio
        self.clock.advance();
        let dt = self.clock.dt();
        let now = self.clock.now();
        let current_step = self.clock.steps();

        // (2) fontes e integradores - disparos coletados antes de qualquer
        // entrega, então projeções só enxergam o passo corrente já fechado
        let input_spikes: Vec<Vec<usize>> = self
            .inputs
            .iter_mut()
            .map(|source| source.generate(dt))
            .collect();

        let population_spikes: Vec<Vec<usize>> = self
            .populations
            .iter_mut()
            .map(|pop| pop.step())
            .collect();

        // (3) entrega + STDP
        for k in 0..self.projections.len() {
            let proj = &mut self.projections[k];
            let target = proj.target().0;

            let pre_spikes: &[usize] = match proj.source() {
                SourceRef::Population(p) => &population_spikes[p.0],
                SourceRef::Input(i) => &input_spikes[i.0],
            };

            proj.process_pre_spikes(pre_spikes, current_step, &mut self.populations[target]);
            proj.process_post_spikes(&population_spikes[target]);
        }

        // (4) decaimento de traços + guarda numérica
        for proj in &mut self.projections {
            proj.end_of_step()?;
        }
        for pop in &self.populations {
            pop.check_finite()?;
        }

        // (5) monitores
        for monitor in &mut self.spike_monitors {
            let spikes: &[usize] = match monitor.source() {
                SourceRef::Population(p) => &population_spikes[p.0],
                SourceRef::Input(i) => &input_spikes[i.0],
            };
            monitor.record(now, spikes);
        }
        for monitor in &mut self.state_monitors {
            let pop = &self.populations[monitor.population().0];
            monitor.sample(now, pop);
        }
        for monitor in &mut self.weight_monitors {
            let proj = &self.projections[monitor.projection().0];
            monitor.sample(now, proj);
        }

        Ok(())
    }

    /// Executa a simulação por `duration` ms.
    ///
    /// Reentrante: `run(T/2)` seguido de `run(T/2)` produz estado idêntico a
    /// `run(T)` - todo o estado persiste entre chamadas.
    ///
    /// A duração é arredondada para o número inteiro de passos mais próximo
    /// **por chamada**; a equivalência entre execução única e fragmentada
    /// vale quando cada duração é múltiplo de `dt`.
    pub fn run(&mut self, duration: f64) -> Result<(), String> {
        let steps = self.clock.steps_for(duration)?;
        self.state = NetworkState::Running;
        for _ in 0..steps {
            self.step()?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Network")
            .field("dt", &self.clock.dt())
            .field("time", &self.clock.now())
            .field("populations", &self.populations.len())
            .field("inputs", &self.inputs.len())
            .field("projections", &self.projections.len())
            .field("state", &self.state)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::SpikeGenerator;
    use crate::projection::{Connectivity, ProjectionSpec};

    #[test]
    fn test_network_rejects_invalid_dt() {
        assert!(Network::new(0.0, 42).is_err());
    }

    #[test]
    fn test_connect_validates_endpoints() {
        let mut net = Network::with_defaults(42);
        let pop = net.add_population(4, LifConfig::default()).unwrap();

        // Alvo inexistente
        let bad = net.connect(
            SourceRef::Population(pop),
            PopulationId(7),
            ProjectionSpec::fixed(Connectivity::AllToAll, 0.1),
        );
        assert!(bad.is_err());

        // Um-para-um com tamanhos diferentes
        let other = net.add_population(8, LifConfig::default()).unwrap();
        let bad = net.connect(
            SourceRef::Population(pop),
            other,
            ProjectionSpec::fixed(Connectivity::OneToOne, 0.1),
        );
        assert!(bad.is_err());
    }

    #[test]
    fn test_plastic_initial_weights_must_respect_bounds() {
        let mut net = Network::with_defaults(42);
        let a = net.add_population(2, LifConfig::default()).unwrap();
        let b = net.add_population(2, LifConfig::default()).unwrap();

        let mut spec = ProjectionSpec::plastic(
            Connectivity::AllToAll,
            crate::plasticity::StdpConfig::default(), // w_max = 0.01
            crate::projection::WeightInit::Constant(0.5),
        );
        assert!(net.connect(SourceRef::Population(a), b, spec.clone()).is_err());

        spec.init = crate::projection::WeightInit::Constant(0.005);
        assert!(net.connect(SourceRef::Population(a), b, spec).is_ok());
    }

    #[test]
    fn test_input_drives_population_through_projection() {
        let mut net = Network::with_defaults(42);
        let pop = net.add_population(1, LifConfig::default()).unwrap();
        let gen = SpikeGenerator::new(1, vec![(0, 1.0)]).unwrap();
        let input = net.add_input(Box::new(gen)).unwrap();

        // Peso 1.5 > limiar 1.0: cada disparo de entrada dispara o neurônio
        net.connect(
            SourceRef::Input(input),
            pop,
            ProjectionSpec::fixed(Connectivity::OneToOne, 1.5),
        )
        .unwrap();
        let monitor = net.monitor_spikes(SourceRef::Population(pop)).unwrap();

        net.run(5.0).unwrap();
        assert_eq!(net.spikes(monitor).count(), 1);
    }

    #[test]
    fn test_nonfinite_potential_surfaces_error() {
        let mut net = Network::with_defaults(42);
        let pop = net.add_population(1, LifConfig::default()).unwrap();
        let gen = SpikeGenerator::new(1, vec![(0, 1.0), (0, 2.0)]).unwrap();
        let input = net.add_input(Box::new(gen)).unwrap();

        // Peso finito mas enorme: passa na validação de construção, e o
        // segundo incremento estoura o potencial para -inf
        net.connect(
            SourceRef::Input(input),
            pop,
            ProjectionSpec::fixed(Connectivity::OneToOne, -1.0e308),
        )
        .unwrap();

        assert!(net.run(5.0).is_err());
    }

    #[test]
    fn test_run_rounds_duration_per_call() {
        // dt = 0.1: duas chamadas de 0.05ms arredondam para um passo cada,
        // uma chamada de 0.1ms para um passo só - durações fora da grade de
        // dt quebram a equivalência fragmentada
        let mut chunked = Network::with_defaults(42);
        chunked.run(0.05).unwrap();
        chunked.run(0.05).unwrap();
        assert_eq!(chunked.steps(), 2);

        let mut single = Network::with_defaults(42);
        single.run(0.1).unwrap();
        assert_eq!(single.steps(), 1);
    }

    #[test]
    fn test_state_transitions_to_running() {
        let mut net = Network::with_defaults(42);
        assert_eq!(net.state(), NetworkState::Idle);
        net.run(1.0).unwrap();
        assert_eq!(net.state(), NetworkState::Running);
    }

    #[test]
    fn test_monitor_validation() {
        let mut net = Network::with_defaults(42);
        let pop = net.add_population(3, LifConfig::default()).unwrap();

        assert!(net
            .monitor_state(pop, RecordVariable::Potential, vec![5])
            .is_err());
        assert!(net
            .monitor_state(pop, RecordVariable::Potential, vec![0, 2])
            .is_ok());
    }
}
