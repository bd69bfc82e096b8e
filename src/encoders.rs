//! # Codificação de Imagens em Taxas de Disparo
//!
//! Converte uma matriz 2D de intensidades em um vetor 1D de taxas (Hz),
//! mapeado linearmente entre `min_rate` e `max_rate`. O vetor resultante
//! alimenta diretamente uma [`PoissonSource`](crate::input::PoissonSource)
//! de mesmo comprimento.
//!
//! A flag `invert` controla a polaridade: com ela ligada, pixels mais
//! intensos (claros) produzem taxas mais baixas - o mapeamento natural para
//! dígitos escuros sobre fundo claro.

use crate::constants::encoding;

/// Codificador linear intensidade → taxa
#[derive(Debug, Clone)]
pub struct RateEncoder {
    /// Taxa do pixel menos ativo (Hz), >= 0
    pub min_rate: f64,

    /// Taxa do pixel mais ativo (Hz), >= `min_rate`
    pub max_rate: f64,

    /// Inverte a polaridade do mapeamento
    pub invert: bool,

    /// Valor de fundo de escala usado na normalização para [0, 1]
    pub full_scale: f64,
}

impl Default for RateEncoder {
    fn default() -> Self {
        Self {
            min_rate: encoding::MIN_RATE,
            max_rate: encoding::MAX_RATE,
            invert: true,
            full_scale: encoding::FULL_SCALE,
        }
    }
}

impl RateEncoder {
    /// Valida o codificador
    pub fn validate(&self) -> Result<(), String> {
        if !self.min_rate.is_finite() || self.min_rate < 0.0 {
            return Err(format!("min_rate inválida: {}", self.min_rate));
        }
        if !self.max_rate.is_finite() || self.max_rate < self.min_rate {
            return Err(format!(
                "max_rate {} menor que min_rate {}",
                self.max_rate, self.min_rate
            ));
        }
        if !self.full_scale.is_finite() || self.full_scale <= 0.0 {
            return Err(format!("full_scale inválido: {}", self.full_scale));
        }
        Ok(())
    }

    /// Codifica uma matriz 2D (linhas de mesmo comprimento) em um vetor de
    /// taxas achatado em ordem de linhas.
    pub fn encode(&self, image: &[Vec<f64>]) -> Result<Vec<f64>, String> {
        self.validate()?;
        if image.is_empty() || image[0].is_empty() {
            return Err("imagem vazia".to_string());
        }
        let width = image[0].len();
        for (row, pixels) in image.iter().enumerate() {
            if pixels.len() != width {
                return Err(format!(
                    "linha {} com {} pixels, esperado {}",
                    row,
                    pixels.len(),
                    width
                ));
            }
        }

        let mut rates = Vec::with_capacity(image.len() * width);
        for pixels in image {
            for &pixel in pixels {
                rates.push(self.pixel_to_rate(pixel)?);
            }
        }
        Ok(rates)
    }

    /// Codifica um vetor de pixels já achatado
    pub fn encode_flat(&self, pixels: &[f64]) -> Result<Vec<f64>, String> {
        self.validate()?;
        if pixels.is_empty() {
            return Err("imagem vazia".to_string());
        }
        pixels.iter().map(|&p| self.pixel_to_rate(p)).collect()
    }

    fn pixel_to_rate(&self, pixel: f64) -> Result<f64, String> {
        if !pixel.is_finite() {
            return Err(format!("pixel não finito: {}", pixel));
        }
        let mut x = (pixel / self.full_scale).clamp(0.0, 1.0);
        if self.invert {
            x = 1.0 - x;
        }
        Ok(self.min_rate + x * (self.max_rate - self.min_rate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_validation() {
        let mut encoder = RateEncoder::default();
        assert!(encoder.validate().is_ok());

        encoder.min_rate = -1.0;
        assert!(encoder.validate().is_err());

        encoder.min_rate = 50.0;
        encoder.max_rate = 10.0;
        assert!(encoder.validate().is_err());
    }

    #[test]
    fn test_linear_mapping_without_inversion() {
        let encoder = RateEncoder {
            min_rate: 0.0,
            max_rate: 100.0,
            invert: false,
            full_scale: 255.0,
        };

        let rates = encoder.encode(&[vec![0.0, 127.5, 255.0]]).unwrap();
        assert_relative_eq!(rates[0], 0.0);
        assert_relative_eq!(rates[1], 50.0);
        assert_relative_eq!(rates[2], 100.0);
    }

    #[test]
    fn test_inversion_flips_polarity() {
        let encoder = RateEncoder {
            invert: true,
            ..RateEncoder::default()
        };

        let rates = encoder.encode(&[vec![0.0, 255.0]]).unwrap();
        assert_relative_eq!(rates[0], 100.0);
        assert_relative_eq!(rates[1], 0.0);
    }

    #[test]
    fn test_rejects_ragged_image() {
        let encoder = RateEncoder::default();
        assert!(encoder.encode(&[vec![0.0, 1.0], vec![0.0]]).is_err());
        assert!(encoder.encode(&[]).is_err());
    }

    #[test]
    fn test_flattens_row_major() {
        let encoder = RateEncoder {
            min_rate: 0.0,
            max_rate: 255.0,
            invert: false,
            full_scale: 255.0,
        };
        let rates = encoder
            .encode(&[vec![1.0, 2.0], vec![3.0, 4.0]])
            .unwrap();
        assert_eq!(rates, vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_out_of_range_pixels_are_clamped() {
        let encoder = RateEncoder {
            min_rate: 0.0,
            max_rate: 100.0,
            invert: false,
            full_scale: 255.0,
        };
        let rates = encoder.encode_flat(&[-10.0, 300.0]).unwrap();
        assert_relative_eq!(rates[0], 0.0);
        assert_relative_eq!(rates[1], 100.0);
    }
}
