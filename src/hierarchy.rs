//! # Hierarquia de Colunas
//!
//! Encadeia uma fonte de entrada externa por uma sequência de colunas via
//! projeções entre camadas (plásticas ou estáticas), produzindo uma rede de
//! aprendizado de características em camadas:
//!
//! `entrada → [coluna 1] → [coluna 2] → ...`
//!
//! Cada fronteira de camada (entrada→primeira coluna, coluna k→coluna k+1)
//! tem parâmetros de aprendizado configuráveis de forma independente. As
//! fronteiras são registros explícitos validados na construção - nomes de
//! camada duplicados ou vazios são rejeitados cedo, e consultas por nome
//! desconhecido devolvem erro em vez de caírem em um padrão silencioso.

use crate::column::{Column, ColumnConfig};
use crate::constants::learning;
use crate::network::{InputId, Network, ProjectionId, SourceRef};
use crate::plasticity::StdpConfig;
use crate::projection::{Connectivity, ProjectionSpec, WeightInit};

/// Configuração da projeção que alimenta uma camada
#[derive(Debug, Clone)]
pub enum BoundaryConfig {
    /// Projeção plástica com regra STDP e inicialização de pesos próprias
    Plastic { stdp: StdpConfig, init: WeightInit },
    /// Projeção estática com peso fixo
    Static { weight: f64 },
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        Self::Plastic {
            stdp: StdpConfig::for_layer_boundary(),
            init: WeightInit::Uniform {
                lo: 0.0,
                hi: learning::LAYER_W_MAX,
            },
        }
    }
}

impl BoundaryConfig {
    /// Fronteira estática com o peso padrão
    pub fn fixed_default() -> Self {
        Self::Static {
            weight: learning::STATIC_LAYER_WEIGHT,
        }
    }
}

/// Especificação de uma camada da hierarquia
#[derive(Debug, Clone)]
pub struct LayerSpec {
    /// Nome único da camada, usado no acesso nomeado
    pub name: String,

    /// Configuração da coluna desta camada
    pub column: ColumnConfig,

    /// Configuração da projeção que chega nesta camada
    pub boundary: BoundaryConfig,
}

impl LayerSpec {
    /// Camada com configuração padrão (coluna padrão, fronteira plástica)
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            column: ColumnConfig::default(),
            boundary: BoundaryConfig::default(),
        }
    }
}

/// Uma camada construída: coluna + projeção de chegada
#[derive(Debug, Clone)]
struct Layer {
    name: String,
    column: Column,
    boundary: ProjectionId,
}

/// Hierarquia construída dentro de uma rede
#[derive(Debug, Clone)]
pub struct Hierarchy {
    input: InputId,
    layers: Vec<Layer>,
}

impl Hierarchy {
    /// Constrói a hierarquia dentro da rede.
    ///
    /// Para cada entrada da lista, instancia a coluna e em seguida a
    /// projeção da fronteira (os extremos precisam existir antes da
    /// projeção). A fonte da primeira fronteira é a entrada externa; das
    /// seguintes, a população excitatória da camada anterior.
    pub fn build(net: &mut Network, input: InputId, specs: &[LayerSpec]) -> Result<Self, String> {
        if specs.is_empty() {
            return Err("hierarquia precisa de pelo menos uma camada".to_string());
        }
        for (k, spec) in specs.iter().enumerate() {
            if spec.name.is_empty() {
                return Err(format!("camada {} com nome vazio", k));
            }
            if specs[..k].iter().any(|other| other.name == spec.name) {
                return Err(format!("nome de camada duplicado: '{}'", spec.name));
            }
        }

        let mut layers: Vec<Layer> = Vec::with_capacity(specs.len());
        let mut source = SourceRef::Input(input);

        for spec in specs {
            let column = Column::build(net, &spec.column)?;

            let projection_spec = match &spec.boundary {
                BoundaryConfig::Plastic { stdp, init } => {
                    ProjectionSpec::plastic(Connectivity::AllToAll, stdp.clone(), *init)
                }
                BoundaryConfig::Static { weight } => {
                    ProjectionSpec::fixed(Connectivity::AllToAll, *weight)
                }
            };
            let boundary = net.connect(source, column.excitatory(), projection_spec)?;

            source = SourceRef::Population(column.excitatory());
            layers.push(Layer {
                name: spec.name.clone(),
                column,
                boundary,
            });
        }

        Ok(Self { input, layers })
    }

    /// Fonte de entrada da hierarquia
    pub fn input(&self) -> InputId {
        self.input
    }

    /// Número de camadas
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Verdadeiro se não há camadas (nunca, por construção)
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Nomes das camadas, na ordem da cadeia
    pub fn layer_names(&self) -> Vec<&str> {
        self.layers.iter().map(|layer| layer.name.as_str()).collect()
    }

    /// Coluna da camada nomeada
    pub fn column(&self, name: &str) -> Result<&Column, String> {
        self.layers
            .iter()
            .find(|layer| layer.name == name)
            .map(|layer| &layer.column)
            .ok_or_else(|| format!("camada desconhecida: '{}'", name))
    }

    /// Projeção de fronteira que chega na camada nomeada
    pub fn boundary(&self, name: &str) -> Result<ProjectionId, String> {
        self.layers
            .iter()
            .find(|layer| layer.name == name)
            .map(|layer| layer.boundary)
            .ok_or_else(|| format!("camada desconhecida: '{}'", name))
    }
}
