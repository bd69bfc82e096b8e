//! # PSINet: Simulador de Redes de Neurônios Pulsantes
//!
//! Simulação determinística em tempo discreto de pequenas redes de neurônios
//! Leaky Integrate-and-Fire, com plasticidade STDP baseada em traços e
//! colunas excitatórias/inibitórias que implementam competição local
//! (winner-take-all suave) - a base para aprendizado não supervisionado de
//! características.
//!
//! ## Módulos Core
//!
//! - **clock**: relógio discreto da simulação (`dt`, tempo corrente)
//! - **population**: populações homogêneas de neurônios LIF
//! - **projection**: conectividade ponderada com entrega de disparos
//! - **plasticity**: regra STDP acoplável a projeções
//! - **column**: coluna E/I com inibição lateral
//! - **hierarchy**: cadeia de colunas com fronteiras de aprendizado
//! - **network**: contêiner de execução e laço de simulação
//! - **input / monitors / encoders**: fronteiras de entrada e observação
//!
//! ## Exemplo de Uso
//!
//! ```rust,no_run
//! use psinet::network::{Network, SourceRef};
//! use psinet::population::LifConfig;
//! use psinet::projection::{Connectivity, ProjectionSpec};
//! use psinet::input::PoissonSource;
//!
//! let mut net = Network::with_defaults(42);
//!
//! let pop = net.add_population(100, LifConfig::default()).unwrap();
//! let input = net
//!     .add_input(Box::new(PoissonSource::new(vec![20.0; 100], 42).unwrap()))
//!     .unwrap();
//! net.connect(
//!     SourceRef::Input(input),
//!     pop,
//!     ProjectionSpec::fixed(Connectivity::OneToOne, 1.5),
//! )
//! .unwrap();
//!
//! let monitor = net.monitor_spikes(SourceRef::Population(pop)).unwrap();
//! net.run(1000.0).unwrap(); // 1 segundo de simulação
//! println!("{} disparos", net.spikes(monitor).count());
//! ```

pub mod clock;
pub mod column;
pub mod constants;
pub mod encoders;
pub mod hierarchy;
pub mod input;
pub mod monitors;
pub mod network;
pub mod plasticity;
pub mod population;
pub mod projection;

// Re-exporta os tipos comuns para conveniência
pub use clock::Clock;
pub use column::{Column, ColumnConfig};
pub use encoders::RateEncoder;
pub use hierarchy::{BoundaryConfig, Hierarchy, LayerSpec};
pub use input::{InputSource, PoissonSource, SpikeGenerator};
pub use monitors::{RecordVariable, SpikeMonitor, StateMonitor, WeightMonitor};
pub use network::{
    InputId, Network, NetworkState, PopulationId, ProjectionId, SourceRef,
};
pub use plasticity::{StdpConfig, StdpState};
pub use population::{IntegrationMethod, LifConfig, NeuronPopulation};
pub use projection::{Connectivity, DeliveryTarget, Projection, ProjectionSpec, WeightInit};
