//! # Relógio da Simulação
//!
//! Dono do passo de tempo global (`dt`) e do tempo corrente. O relógio é
//! propriedade exclusiva da [`Network`](crate::network::Network) e só avança
//! dentro do laço de simulação - nenhum componente mantém um relógio global
//! implícito.
//!
//! O tempo corrente é derivado de um contador inteiro de passos
//! (`t = passos * dt`), o que evita deriva de ponto flutuante e garante que
//! execuções fragmentadas reproduzam exatamente o mesmo eixo temporal.

/// Relógio discreto da simulação. Tempos em milissegundos.
#[derive(Debug, Clone)]
pub struct Clock {
    /// Passo de integração (ms), fixo após a construção
    dt: f64,

    /// Número de passos já executados
    steps: u64,
}

impl Clock {
    /// Cria um relógio com o passo dado.
    ///
    /// Rejeita `dt` não positivo ou não finito.
    pub fn new(dt: f64) -> Result<Self, String> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(format!("passo de tempo inválido: dt = {}", dt));
        }
        Ok(Self { dt, steps: 0 })
    }

    /// Passo de integração (ms)
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Número de passos já executados
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Tempo corrente (ms)
    pub fn now(&self) -> f64 {
        self.steps as f64 * self.dt
    }

    /// Avança o relógio em um passo. Chamado apenas pelo laço da rede.
    pub(crate) fn advance(&mut self) {
        self.steps += 1;
    }

    /// Converte uma duração (ms) em número de passos, arredondando para o
    /// passo mais próximo.
    ///
    /// O arredondamento é por chamada: durações que não são múltiplos de
    /// `dt` acumulam o resto a cada conversão, então execuções fragmentadas
    /// só equivalem a uma única quando cada fragmento cai na grade de `dt`.
    pub fn steps_for(&self, duration: f64) -> Result<u64, String> {
        if !duration.is_finite() || duration < 0.0 {
            return Err(format!("duração inválida: {}", duration));
        }
        Ok((duration / self.dt).round() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_clock_rejects_invalid_dt() {
        assert!(Clock::new(0.0).is_err());
        assert!(Clock::new(-0.1).is_err());
        assert!(Clock::new(f64::NAN).is_err());
    }

    #[test]
    fn test_clock_advances_monotonically() {
        let mut clock = Clock::new(0.1).unwrap();
        assert_eq!(clock.steps(), 0);

        for _ in 0..10 {
            clock.advance();
        }

        assert_eq!(clock.steps(), 10);
        assert_relative_eq!(clock.now(), 1.0);
    }

    #[test]
    fn test_steps_for_rounds_to_nearest() {
        let clock = Clock::new(0.1).unwrap();
        assert_eq!(clock.steps_for(100.0).unwrap(), 1000);
        assert_eq!(clock.steps_for(0.05).unwrap(), 1);
        assert!(clock.steps_for(-1.0).is_err());
    }
}
