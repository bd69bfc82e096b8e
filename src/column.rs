//! # Coluna Excitatória/Inibitória
//!
//! Uma coluna compõe uma população excitatória E e uma inibitória I com
//! projeções recorrentes fixas (E→I e I→E, opcionalmente I→I) para realizar
//! competição local: neurônios excitatórios fortemente dirigidos recrutam
//! inibição que suprime os competidores fracos - um winner-take-all suave
//! que realça o contraste do padrão de saída.
//!
//! Nenhuma plasticidade dentro da coluna: apenas as projeções de entrada e
//! entre camadas aprendem. A força da inibição lateral é um único escalar
//! que multiplica o peso I→E; ligar/desligar a inibição é uma escolha de
//! construção.
//!
//! A população excitatória é a "saída" da coluna para conexões a jusante.

use crate::constants::column;
use crate::network::{Network, PopulationId, ProjectionId, SourceRef};
use crate::population::LifConfig;
use crate::projection::{Connectivity, ProjectionSpec};

/// Configuração de uma coluna E/I
#[derive(Debug, Clone)]
pub struct ColumnConfig {
    /// Número de neurônios excitatórios
    pub n_excitatory: usize,

    /// Número de neurônios inibitórios
    pub n_inhibitory: usize,

    /// Parâmetros LIF compartilhados pelas duas populações
    pub neuron: LifConfig,

    /// Habilita a inibição lateral I→E (decisão de construção)
    pub lateral_inhibition: bool,

    /// Força da inibição lateral: o peso I→E é `-lateral_strength`
    pub lateral_strength: f64,

    /// Habilita a projeção opcional I→I
    pub self_inhibition: bool,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            n_excitatory: column::N_EXCITATORY,
            n_inhibitory: column::N_INHIBITORY,
            neuron: LifConfig::default(),
            lateral_inhibition: true,
            lateral_strength: column::LATERAL_STRENGTH,
            self_inhibition: false,
        }
    }
}

impl ColumnConfig {
    /// Valida a configuração antes da construção
    pub fn validate(&self) -> Result<(), String> {
        if self.n_excitatory == 0 {
            return Err("coluna precisa de neurônios excitatórios".to_string());
        }
        if self.n_inhibitory == 0 {
            return Err("coluna precisa de neurônios inibitórios".to_string());
        }
        if !self.lateral_strength.is_finite() || self.lateral_strength < 0.0 {
            return Err(format!(
                "força de inibição lateral inválida: {}",
                self.lateral_strength
            ));
        }
        self.neuron.validate()
    }
}

/// Coluna construída dentro de uma rede
#[derive(Debug, Clone)]
pub struct Column {
    excitatory: PopulationId,
    inhibitory: PopulationId,

    exc_to_inh: ProjectionId,
    inh_to_exc: Option<ProjectionId>,
    inh_to_inh: Option<ProjectionId>,
}

impl Column {
    /// Constrói a coluna dentro da rede: cria as duas populações e o
    /// cabeamento recorrente fixo.
    ///
    /// Ordem de composição: populações primeiro, depois as projeções que as
    /// conectam (os extremos de uma projeção precisam existir antes dela).
    pub fn build(net: &mut Network, config: &ColumnConfig) -> Result<Self, String> {
        config.validate()?;

        let excitatory = net.add_population(config.n_excitatory, config.neuron.clone())?;
        let inhibitory = net.add_population(config.n_inhibitory, config.neuron.clone())?;

        let exc_to_inh = net.connect(
            SourceRef::Population(excitatory),
            inhibitory,
            ProjectionSpec::fixed(Connectivity::AllToAll, column::EXC_TO_INH_WEIGHT),
        )?;

        let inh_to_exc = if config.lateral_inhibition {
            Some(net.connect(
                SourceRef::Population(inhibitory),
                excitatory,
                ProjectionSpec::fixed(Connectivity::AllToAll, -config.lateral_strength),
            )?)
        } else {
            None
        };

        let inh_to_inh = if config.self_inhibition {
            Some(net.connect(
                SourceRef::Population(inhibitory),
                inhibitory,
                ProjectionSpec::fixed(Connectivity::AllToAll, -column::SELF_INHIBITION_WEIGHT),
            )?)
        } else {
            None
        };

        Ok(Self {
            excitatory,
            inhibitory,
            exc_to_inh,
            inh_to_exc,
            inh_to_inh,
        })
    }

    /// População excitatória - a saída da coluna
    pub fn excitatory(&self) -> PopulationId {
        self.excitatory
    }

    /// População inibitória
    pub fn inhibitory(&self) -> PopulationId {
        self.inhibitory
    }

    /// Projeção fixa E→I
    pub fn exc_to_inh(&self) -> ProjectionId {
        self.exc_to_inh
    }

    /// Projeção fixa I→E, presente quando a inibição lateral está habilitada
    pub fn inh_to_exc(&self) -> Option<ProjectionId> {
        self.inh_to_exc
    }

    /// Projeção opcional I→I
    pub fn inh_to_inh(&self) -> Option<ProjectionId> {
        self.inh_to_inh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::Network;

    #[test]
    fn test_config_validation() {
        let mut config = ColumnConfig::default();
        assert!(config.validate().is_ok());

        config.n_excitatory = 0;
        assert!(config.validate().is_err());

        config.n_excitatory = 10;
        config.lateral_strength = -0.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_build_wires_populations() {
        let mut net = Network::with_defaults(42);
        let column = Column::build(&mut net, &ColumnConfig::default()).unwrap();

        assert_eq!(net.population(column.excitatory()).len(), 100);
        assert_eq!(net.population(column.inhibitory()).len(), 25);

        // E→I: todas as sinapses positivas; I→E: todas negativas
        let e2i = net.projection(column.exc_to_inh());
        assert_eq!(e2i.num_synapses(), 100 * 25);
        assert!(e2i.weights().iter().all(|&w| w > 0.0));

        let i2e = net.projection(column.inh_to_exc().unwrap());
        assert!(i2e.weights().iter().all(|&w| w < 0.0));
        assert!(!i2e.is_plastic());
    }

    #[test]
    fn test_lateral_inhibition_is_construction_switch() {
        let mut net = Network::with_defaults(42);
        let config = ColumnConfig {
            lateral_inhibition: false,
            ..ColumnConfig::default()
        };
        let column = Column::build(&mut net, &config).unwrap();
        assert!(column.inh_to_exc().is_none());
        assert!(column.inh_to_inh().is_none());
    }

    #[test]
    fn test_self_inhibition_optional() {
        let mut net = Network::with_defaults(42);
        let config = ColumnConfig {
            self_inhibition: true,
            ..ColumnConfig::default()
        };
        let column = Column::build(&mut net, &config).unwrap();
        assert!(column.inh_to_inh().is_some());
    }
}
