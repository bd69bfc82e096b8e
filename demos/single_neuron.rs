//! Demonstração: um neurônio LIF com drive constante supraliminar.
//!
//! Reproduz o experimento clássico de validação do integrador: o período de
//! disparo observado deve bater com a forma fechada
//! `refratário + tau * ln(I / (I - limiar))`.

use psinet::network::{Network, SourceRef};
use psinet::population::LifConfig;

fn main() {
    println!("╔═════════════════════════════════════════╗");
    println!("║   PSINet - Teste de Neurônio Único      ║");
    println!("╚═════════════════════════════════════════╝\n");

    let drive = 1.1;
    let config = LifConfig::default();

    let mut net = Network::with_defaults(42);
    let pop = match net.add_population(1, config.clone()) {
        Ok(pop) => pop,
        Err(e) => {
            eprintln!("Erro ao criar população: {}", e);
            return;
        }
    };
    net.population_mut(pop).set_drive(0, drive).unwrap();

    let monitor = net.monitor_spikes(SourceRef::Population(pop)).unwrap();

    let duration = 100.0;
    println!("Simulando {}ms com drive I = {}...", duration, drive);
    if let Err(e) = net.run(duration) {
        eprintln!("Erro na simulação: {}", e);
        return;
    }

    let spikes = net.spikes(monitor);
    println!("\n=== RESULTADOS ===");
    println!("Total de disparos: {}", spikes.count());

    let times = spikes.times_for(0);
    if let (Some(first), Some(last)) = (times.first(), times.last()) {
        println!("Primeiro disparo: {:.2}ms", first);
        println!("Último disparo: {:.2}ms", last);
    }

    if times.len() > 1 {
        let intervals: Vec<f64> = times.windows(2).map(|pair| pair[1] - pair[0]).collect();
        let mean_isi = intervals.iter().sum::<f64>() / intervals.len() as f64;
        let expected =
            config.refractory + config.tau * (drive / (drive - config.threshold)).ln();

        println!("Intervalo médio entre disparos: {:.2}ms", mean_isi);
        println!("Forma fechada esperada: {:.2}ms", expected);
        println!("Frequência de disparo: {:.2}Hz", 1000.0 / mean_isi);
    }
}
