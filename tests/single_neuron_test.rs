//! Testes de dinâmica de um neurônio LIF isolado: período de disparo em
//! forma fechada e exclusão refratária.

use psinet::input::PoissonSource;
use psinet::network::{Network, SourceRef};
use psinet::population::LifConfig;
use psinet::projection::{Connectivity, ProjectionSpec};

/// Com drive constante `I > threshold`, reset em 0 e integrador exato, o
/// período de disparo tem forma fechada:
///
/// `período = refratário + tau * ln(I / (I - threshold))`
///
/// O intervalo simulado deve bater com a fórmula dentro de um passo.
#[test]
fn firing_period_matches_closed_form() {
    let dt = 0.1;
    let tau = 10.0;
    let threshold = 1.0;
    let refractory = 5.0;
    let drive = 1.1;

    let mut net = Network::new(dt, 42).unwrap();
    let pop = net
        .add_population(
            1,
            LifConfig {
                tau,
                threshold,
                reset: 0.0,
                refractory,
                ..LifConfig::default()
            },
        )
        .unwrap();
    net.population_mut(pop).set_drive(0, drive).unwrap();
    let monitor = net.monitor_spikes(SourceRef::Population(pop)).unwrap();

    net.run(500.0).unwrap();

    let times = net.spikes(monitor).times_for(0);
    assert!(times.len() > 10, "apenas {} disparos em 500ms", times.len());

    let expected = refractory + tau * (drive / (drive - threshold)).ln();
    for pair in times.windows(2) {
        let isi = pair[1] - pair[0];
        assert!(
            (isi - expected).abs() <= dt + 1e-9,
            "ISI {} fora da forma fechada {} (tolerância {})",
            isi,
            expected,
            dt
        );
    }
}

/// Nenhum neurônio emite dois disparos com intervalo menor que o período
/// refratário configurado - mesmo sob bombardeio sináptico intenso.
#[test]
fn refractory_period_excludes_early_spikes() {
    let refractory = 5.0;

    let mut net = Network::new(0.1, 7).unwrap();
    let pop = net
        .add_population(
            10,
            LifConfig {
                refractory,
                ..LifConfig::default()
            },
        )
        .unwrap();

    // Entrada de Poisson agressiva: 500Hz por neurônio, peso supraliminar
    let input = net
        .add_input(Box::new(PoissonSource::new(vec![500.0; 10], 7).unwrap()))
        .unwrap();
    net.connect(
        SourceRef::Input(input),
        pop,
        ProjectionSpec::fixed(Connectivity::OneToOne, 1.5),
    )
    .unwrap();
    let monitor = net.monitor_spikes(SourceRef::Population(pop)).unwrap();

    net.run(2000.0).unwrap();

    let spikes = net.spikes(monitor);
    assert!(spikes.count() > 100, "bombardeio deveria produzir disparos");

    for neuron in 0..10 {
        let times = spikes.times_for(neuron);
        for pair in times.windows(2) {
            let gap = pair[1] - pair[0];
            assert!(
                gap >= refractory - 1e-9,
                "neurônio {} disparou com intervalo {} < refratário {}",
                neuron,
                gap,
                refractory
            );
        }
    }
}

/// O drive constante abaixo do limiar nunca dispara; a membrana converge
/// para o próprio drive.
#[test]
fn subthreshold_drive_never_fires() {
    let mut net = Network::new(0.1, 42).unwrap();
    let pop = net.add_population(1, LifConfig::default()).unwrap();
    net.population_mut(pop).set_drive(0, 0.9).unwrap();
    let monitor = net.monitor_spikes(SourceRef::Population(pop)).unwrap();

    net.run(200.0).unwrap();

    assert_eq!(net.spikes(monitor).count(), 0);
    let v = net.population(pop).potential(0);
    assert!((v - 0.9).abs() < 1e-6, "potencial {} não convergiu", v);
}
