//! # Projeção Sináptica
//!
//! Conectividade direcionada e ponderada entre uma fonte (população ou
//! gerador de entrada) e uma população alvo. A entrega é instantânea
//! (`v_alvo += w` no mesmo passo do disparo pré), com atraso opcional em
//! número inteiro de passos.
//!
//! ## Representação
//!
//! A conectividade é expandida na construção para uma lista plana de
//! sinapses `(pré, pós)` e indexada em formato CSR nos dois sentidos:
//! `pré → sinapses` para a entrega e `pós → sinapses` para o ramo pós do
//! STDP. A conectividade é **imutável** após a construção; apenas os pesos
//! mudam (e somente se a projeção for plástica).
//!
//! A plasticidade é um comportamento anexado ([`StdpState`]) - a projeção
//! expõe a mesma interface de pesos e conectividade com ou sem aprendizado.

use std::collections::VecDeque;

use crate::network::{PopulationId, SourceRef};
use crate::plasticity::StdpState;
use crate::population::NeuronPopulation;

/// Padrão de conectividade de uma projeção
#[derive(Debug, Clone)]
pub enum Connectivity {
    /// Cada índice da fonte conecta a todos os índices do alvo
    /// (usado entre camadas)
    AllToAll,
    /// Conexão alinhada por índice; exige fonte e alvo do mesmo tamanho
    /// (usado para estimular uma população diretamente)
    OneToOne,
    /// Lista explícita de pares `(pré, pós)`
    Pairs(Vec<(usize, usize)>),
}

/// Inicialização dos pesos sinápticos
#[derive(Debug, Clone, Copy)]
pub enum WeightInit {
    /// Todos os pesos com o mesmo valor
    Constant(f64),
    /// Pesos uniformes em `[lo, hi)`, sorteados do RNG semeado da rede
    Uniform { lo: f64, hi: f64 },
}

/// Variável do alvo que recebe o incremento sináptico
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeliveryTarget {
    /// `v += w` (padrão; transiente, decai com a membrana)
    #[default]
    Potential,
    /// `I += w` (persistente: soma ao drive constante do alvo)
    Drive,
}

/// Especificação de uma projeção, passada a [`Network::connect`]
///
/// [`Network::connect`]: crate::network::Network::connect
#[derive(Debug, Clone)]
pub struct ProjectionSpec {
    /// Padrão de conectividade
    pub connectivity: Connectivity,

    /// Inicialização dos pesos
    pub init: WeightInit,

    /// Variável do alvo que recebe a entrega
    pub delivery: DeliveryTarget,

    /// Atraso de entrega em passos inteiros (0 = mesmo passo)
    pub delay_steps: usize,

    /// Regra STDP anexada; `None` para projeção estática
    pub plasticity: Option<crate::plasticity::StdpConfig>,
}

impl ProjectionSpec {
    /// Projeção estática com peso constante
    pub fn fixed(connectivity: Connectivity, weight: f64) -> Self {
        Self {
            connectivity,
            init: WeightInit::Constant(weight),
            delivery: DeliveryTarget::Potential,
            delay_steps: 0,
            plasticity: None,
        }
    }

    /// Projeção plástica com regra STDP
    pub fn plastic(
        connectivity: Connectivity,
        stdp: crate::plasticity::StdpConfig,
        init: WeightInit,
    ) -> Self {
        Self {
            connectivity,
            init,
            delivery: DeliveryTarget::Potential,
            delay_steps: 0,
            plasticity: Some(stdp),
        }
    }
}

/// Índice CSR: para cada chave (neurônio pré ou pós), a faixa de sinapses
/// correspondente em `order`.
#[derive(Debug, Clone)]
struct CsrIndex {
    ptr: Vec<usize>,
    order: Vec<usize>,
}

impl CsrIndex {
    /// Constrói o índice a partir da chave de cada sinapse.
    fn build(num_keys: usize, keys: &[usize]) -> Self {
        let mut ptr = vec![0usize; num_keys + 1];
        for &k in keys {
            ptr[k + 1] += 1;
        }
        for k in 0..num_keys {
            ptr[k + 1] += ptr[k];
        }

        let mut cursor = ptr.clone();
        let mut order = vec![0usize; keys.len()];
        for (syn, &k) in keys.iter().enumerate() {
            order[cursor[k]] = syn;
            cursor[k] += 1;
        }

        Self { ptr, order }
    }

    fn synapses_of(&self, key: usize) -> &[usize] {
        &self.order[self.ptr[key]..self.ptr[key + 1]]
    }
}

/// Projeção sináptica entre uma fonte e uma população alvo
#[derive(Debug, Clone)]
pub struct Projection {
    source: SourceRef,
    target: PopulationId,

    /// Neurônio pré de cada sinapse
    pre: Vec<usize>,

    /// Neurônio pós de cada sinapse
    post: Vec<usize>,

    /// Índice pré → sinapses
    by_pre: CsrIndex,

    /// Índice pós → sinapses
    by_post: CsrIndex,

    /// Peso de cada sinapse
    weights: Vec<f64>,

    delivery: DeliveryTarget,
    delay_steps: usize,

    /// Entregas agendadas quando `delay_steps > 0`: `(passo devido, sinapse)`.
    /// FIFO por construção, já que os agendamentos são monotônicos no tempo.
    pending: VecDeque<(u64, usize)>,

    /// Estado STDP, presente apenas em projeções plásticas
    stdp: Option<StdpState>,
}

impl Projection {
    /// Constrói a projeção expandindo a conectividade.
    ///
    /// Chamado por [`Network::connect`], que valida tamanhos e inicializa os
    /// pesos em seguida.
    ///
    /// [`Network::connect`]: crate::network::Network::connect
    pub(crate) fn new(
        source: SourceRef,
        target: PopulationId,
        n_source: usize,
        n_target: usize,
        connectivity: &Connectivity,
        delivery: DeliveryTarget,
        delay_steps: usize,
    ) -> Result<Self, String> {
        let (pre, post): (Vec<usize>, Vec<usize>) = match connectivity {
            Connectivity::AllToAll => {
                let mut pre = Vec::with_capacity(n_source * n_target);
                let mut post = Vec::with_capacity(n_source * n_target);
                for i in 0..n_source {
                    for j in 0..n_target {
                        pre.push(i);
                        post.push(j);
                    }
                }
                (pre, post)
            }
            Connectivity::OneToOne => {
                if n_source != n_target {
                    return Err(format!(
                        "conectividade um-para-um exige tamanhos iguais: fonte {} vs alvo {}",
                        n_source, n_target
                    ));
                }
                ((0..n_source).collect(), (0..n_target).collect())
            }
            Connectivity::Pairs(pairs) => {
                if pairs.is_empty() {
                    return Err("lista explícita de pares vazia".to_string());
                }
                for &(i, j) in pairs {
                    if i >= n_source || j >= n_target {
                        return Err(format!(
                            "par ({}, {}) fora dos limites ({} x {})",
                            i, j, n_source, n_target
                        ));
                    }
                }
                pairs.iter().map(|&(i, j)| (i, j)).unzip()
            }
        };

        let by_pre = CsrIndex::build(n_source, &pre);
        let by_post = CsrIndex::build(n_target, &post);
        let weights = vec![0.0; pre.len()];

        Ok(Self {
            source,
            target,
            pre,
            post,
            by_pre,
            by_post,
            weights,
            delivery,
            delay_steps,
            pending: VecDeque::new(),
            stdp: None,
        })
    }

    /// Anexa o estado STDP (projeção plástica)
    pub(crate) fn attach_stdp(&mut self, stdp: StdpState) {
        self.stdp = Some(stdp);
    }

    /// Fonte da projeção
    pub fn source(&self) -> SourceRef {
        self.source
    }

    /// População alvo
    pub fn target(&self) -> PopulationId {
        self.target
    }

    /// Número de sinapses
    pub fn num_synapses(&self) -> usize {
        self.weights.len()
    }

    /// Pesos sinápticos, na ordem da lista de sinapses
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Par `(pré, pós)` da sinapse `syn`
    pub fn synapse(&self, syn: usize) -> (usize, usize) {
        (self.pre[syn], self.post[syn])
    }

    /// Índice da sinapse que conecta `pre` a `post`, se existir
    pub fn synapse_between(&self, pre: usize, post: usize) -> Option<usize> {
        self.by_pre
            .synapses_of(pre)
            .iter()
            .copied()
            .find(|&syn| self.post[syn] == post)
    }

    /// Peso médio da projeção
    pub fn mean_weight(&self) -> f64 {
        if self.weights.is_empty() {
            return 0.0;
        }
        self.weights.iter().sum::<f64>() / self.weights.len() as f64
    }

    /// Verdadeiro se a projeção carrega uma regra STDP
    pub fn is_plastic(&self) -> bool {
        self.stdp.is_some()
    }

    /// Estado STDP, se plástica
    pub fn stdp(&self) -> Option<&StdpState> {
        self.stdp.as_ref()
    }

    /// Sobrescreve os pesos iniciais. Usado pela rede na construção.
    pub(crate) fn set_weights(&mut self, weights: Vec<f64>) {
        debug_assert_eq!(weights.len(), self.weights.len());
        self.weights = weights;
    }

    /// Entrega de uma sinapse: incremento no alvo com o peso **anterior** ao
    /// ramo pré do STDP, depois o ramo pré (se plástica).
    fn deliver_one(&mut self, syn: usize, pop: &mut NeuronPopulation) {
        let w = self.weights[syn];
        match self.delivery {
            DeliveryTarget::Potential => pop.kick_potential(self.post[syn], w),
            DeliveryTarget::Drive => pop.kick_drive(self.post[syn], w),
        }
        if let Some(stdp) = &mut self.stdp {
            stdp.on_pre(syn, &mut self.weights[syn]);
        }
    }

    /// Processa os disparos pré-sinápticos deste passo.
    ///
    /// Sem atraso, entrega imediatamente; com atraso, agenda cada sinapse e
    /// entrega as que venceram neste passo. Com atraso, o ramo pré do STDP
    /// executa no passo da **entrega**, não no do disparo.
    pub(crate) fn process_pre_spikes(
        &mut self,
        spikes: &[usize],
        current_step: u64,
        pop: &mut NeuronPopulation,
    ) {
        // Entrega agendamentos vencidos antes de criar novos: todo item
        // pendente tem vencimento anterior aos agendados neste passo.
        while let Some(&(due, syn)) = self.pending.front() {
            if due > current_step {
                break;
            }
            self.pending.pop_front();
            self.deliver_one(syn, pop);
        }

        if self.delay_steps == 0 {
            for &pre in spikes {
                let range = self.by_pre.ptr[pre]..self.by_pre.ptr[pre + 1];
                for idx in range {
                    let syn = self.by_pre.order[idx];
                    self.deliver_one(syn, pop);
                }
            }
        } else {
            let due = current_step + self.delay_steps as u64;
            for &pre in spikes {
                for &syn in self.by_pre.synapses_of(pre) {
                    self.pending.push_back((due, syn));
                }
            }
        }
    }

    /// Processa os disparos pós-sinápticos deste passo (ramo pós do STDP).
    ///
    /// Executa depois de [`process_pre_spikes`](Self::process_pre_spikes):
    /// quando pré e pós disparam no mesmo passo, o ramo pré vem primeiro.
    pub(crate) fn process_post_spikes(&mut self, spikes: &[usize]) {
        if let Some(stdp) = &mut self.stdp {
            for &post in spikes {
                let range = self.by_post.ptr[post]..self.by_post.ptr[post + 1];
                for idx in range {
                    let syn = self.by_post.order[idx];
                    stdp.on_post(syn, &mut self.weights[syn]);
                }
            }
        }
    }

    /// Decaimento dos traços e verificação de finitude, uma vez por passo.
    pub(crate) fn end_of_step(&mut self) -> Result<(), String> {
        if let Some(stdp) = &mut self.stdp {
            stdp.decay();
            stdp.check_finite(&self.weights)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plasticity::StdpConfig;
    use crate::population::LifConfig;

    fn pop(n: usize) -> NeuronPopulation {
        NeuronPopulation::new(
            n,
            LifConfig {
                threshold: 100.0, // sem disparos nos testes de entrega
                ..LifConfig::default()
            },
            0.1,
        )
        .unwrap()
    }

    fn projection(
        n_source: usize,
        n_target: usize,
        connectivity: Connectivity,
        delay_steps: usize,
    ) -> Projection {
        let mut proj = Projection::new(
            SourceRef::Population(PopulationId(0)),
            PopulationId(1),
            n_source,
            n_target,
            &connectivity,
            DeliveryTarget::Potential,
            delay_steps,
        )
        .unwrap();
        let n = proj.num_synapses();
        proj.set_weights(vec![0.5; n]);
        proj
    }

    #[test]
    fn test_one_to_one_requires_equal_sizes() {
        let result = Projection::new(
            SourceRef::Population(PopulationId(0)),
            PopulationId(1),
            10,
            5,
            &Connectivity::OneToOne,
            DeliveryTarget::Potential,
            0,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_pairs_out_of_range_rejected() {
        let result = Projection::new(
            SourceRef::Population(PopulationId(0)),
            PopulationId(1),
            4,
            4,
            &Connectivity::Pairs(vec![(0, 1), (3, 4)]),
            DeliveryTarget::Potential,
            0,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_all_to_all_synapse_count() {
        let proj = projection(3, 4, Connectivity::AllToAll, 0);
        assert_eq!(proj.num_synapses(), 12);
        assert!(proj.synapse_between(2, 3).is_some());
    }

    #[test]
    fn test_one_to_one_delivery() {
        let mut proj = projection(4, 4, Connectivity::OneToOne, 0);
        let mut target = pop(4);

        proj.process_pre_spikes(&[1, 3], 1, &mut target);

        assert_eq!(target.potential(0), 0.0);
        assert_eq!(target.potential(1), 0.5);
        assert_eq!(target.potential(2), 0.0);
        assert_eq!(target.potential(3), 0.5);
    }

    #[test]
    fn test_all_to_all_delivery_accumulates() {
        let mut proj = projection(2, 3, Connectivity::AllToAll, 0);
        let mut target = pop(3);

        // Dois disparos pré: cada alvo recebe 2 * 0.5
        proj.process_pre_spikes(&[0, 1], 1, &mut target);

        for j in 0..3 {
            assert_eq!(target.potential(j), 1.0);
        }
    }

    #[test]
    fn test_drive_delivery_is_persistent() {
        let mut proj = Projection::new(
            SourceRef::Population(PopulationId(0)),
            PopulationId(1),
            2,
            2,
            &Connectivity::OneToOne,
            DeliveryTarget::Drive,
            0,
        )
        .unwrap();
        proj.set_weights(vec![0.5; 2]);
        let mut target = pop(2);

        proj.process_pre_spikes(&[0], 1, &mut target);

        // O incremento cai no drive, não no potencial
        assert_eq!(target.drive(0), 0.5);
        assert_eq!(target.potential(0), 0.0);
        assert_eq!(target.drive(1), 0.0);

        // E persiste: a membrana converge para o novo drive
        for _ in 0..1000 {
            target.step();
        }
        assert!((target.potential(0) - 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_delayed_delivery() {
        let mut proj = projection(2, 2, Connectivity::OneToOne, 3);
        let mut target = pop(2);

        // Disparo no passo 1: entrega devida no passo 4
        proj.process_pre_spikes(&[0], 1, &mut target);
        assert_eq!(target.potential(0), 0.0);

        proj.process_pre_spikes(&[], 2, &mut target);
        proj.process_pre_spikes(&[], 3, &mut target);
        assert_eq!(target.potential(0), 0.0);

        proj.process_pre_spikes(&[], 4, &mut target);
        assert_eq!(target.potential(0), 0.5);
    }

    #[test]
    fn test_delayed_projection_runs_pre_branch_at_delivery() {
        let mut proj = projection(1, 1, Connectivity::OneToOne, 2);
        let stdp = StdpState::new(
            1,
            StdpConfig {
                w_max: 1.0,
                a_pre: 0.1,
                a_post: -0.11,
                tau_pre: 20.0,
                tau_post: 20.0,
            },
            0.1,
        )
        .unwrap();
        proj.attach_stdp(stdp);
        let mut target = pop(1);

        // Disparo no passo 1, atraso de 2 passos: nada entregue e traço pré
        // intocado até o vencimento
        proj.process_pre_spikes(&[0], 1, &mut target);
        assert_eq!(target.potential(0), 0.0);
        assert_eq!(proj.stdp().unwrap().apre(0), 0.0);

        proj.process_pre_spikes(&[], 2, &mut target);
        assert_eq!(proj.stdp().unwrap().apre(0), 0.0);

        // Passo 3: entrega e ramo pré acontecem juntos
        proj.process_pre_spikes(&[], 3, &mut target);
        assert_eq!(target.potential(0), 0.5);
        assert_eq!(proj.stdp().unwrap().apre(0), 0.1);
    }

    #[test]
    fn test_static_projection_weights_never_change() {
        let mut proj = projection(2, 2, Connectivity::AllToAll, 0);
        let mut target = pop(2);

        proj.process_pre_spikes(&[0, 1], 1, &mut target);
        proj.process_post_spikes(&[0, 1]);
        proj.end_of_step().unwrap();

        assert!(proj.weights().iter().all(|&w| w == 0.5));
    }
}
