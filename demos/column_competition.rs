//! Demonstração: competição winner-take-all em uma coluna E/I.
//!
//! Duas fases de entrada, como no protocolo original: ruído difuso e depois
//! um foco de alta taxa nos índices 20..30. Com a inibição lateral ligada,
//! o foco deve dominar a saída excitatória na segunda fase.

use psinet::column::{Column, ColumnConfig};
use psinet::input::PoissonSource;
use psinet::network::{Network, SourceRef};
use psinet::projection::{Connectivity, ProjectionSpec};

const N: usize = 100;

fn main() {
    println!("╔═════════════════════════════════════════╗");
    println!("║  PSINet - Competição na Coluna E/I      ║");
    println!("╚═════════════════════════════════════════╝\n");

    let mut net = Network::with_defaults(42);

    let column = match Column::build(&mut net, &ColumnConfig::default()) {
        Ok(column) => column,
        Err(e) => {
            eprintln!("Erro ao construir a coluna: {}", e);
            return;
        }
    };

    // Fase 1: ruído difuso em todos os índices
    let input = net
        .add_input(Box::new(PoissonSource::new(vec![10.0; N], 42).unwrap()))
        .unwrap();
    net.connect(
        SourceRef::Input(input),
        column.excitatory(),
        ProjectionSpec::fixed(Connectivity::OneToOne, 1.5),
    )
    .unwrap();

    let exc_monitor = net.monitor_spikes(SourceRef::Population(column.excitatory())).unwrap();
    let inh_monitor = net.monitor_spikes(SourceRef::Population(column.inhibitory())).unwrap();

    println!("Fase 1: ruído difuso (500ms)...");
    net.run(500.0).unwrap();

    // Fase 2: fundo quase silencioso + foco forte em 20..30
    let mut rates = vec![5.0; N];
    for r in &mut rates[20..30] {
        *r = 80.0;
    }
    net.set_input_rates(input, &rates).unwrap();

    println!("Fase 2: entrada focada em 20..30 (500ms)...");
    net.run(500.0).unwrap();

    let exc = net.spikes(exc_monitor);
    let phase1 = exc.count_in_window(0.0, 500.0);
    let phase2 = exc.count_in_window(500.0, 1000.0);
    let focus = exc.count_in_window_for(500.0, 1000.0, 20..30);

    println!("\n=== RESULTADOS ===");
    println!("Disparos excitatórios na fase 1: {}", phase1);
    println!("Disparos excitatórios na fase 2: {}", phase2);
    println!("Disparos inibitórios (total): {}", net.spikes(inh_monitor).count());

    if phase2 > 0 {
        let share = 100.0 * focus as f64 / phase2 as f64;
        println!("Fatia do foco (20..30) na fase 2: {:.1}%", share);
        if share > 30.0 {
            println!("Winner-take-all efetivo: o foco dominou a saída.");
        } else {
            println!("Competição fraca: o foco não dominou a saída.");
        }
    } else {
        println!("Nenhum disparo excitatório na fase 2.");
    }
}
