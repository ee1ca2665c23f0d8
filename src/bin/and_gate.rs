//! Trains a network on the AND-circuit sample mapping and reports the final
//! error coefficient.

use backprop::Network;

const INPUTS: [[f64; 2]; 4] = [[0.0, 0.0], [0.0, 1.0], [1.0, 0.0], [1.0, 1.0]];
const EXPECTED: [f64; 4] = [1.0, 0.0, 0.0, 1.0];

fn main() {
    let mut network = Network::new(2, 1, &[3], 1, 0.1, 1.0).unwrap();

    while !network.is_trained() {
        let cycle = network.training_cycle();
        let sample = cycle % 4;
        let result = network.compute_result(&INPUTS[sample]).unwrap();
        if cycle % 1000 == 0 {
            println!(
                "Cycle {}:\tinput {:?}\tresult {:.6}\texpected {}",
                cycle, INPUTS[sample], result[0], EXPECTED[sample]
            );
        }
        network.learn(&[EXPECTED[sample]]).unwrap();
    }

    println!("Trained after {} cycles.", network.training_cycle() - 1);
    println!("Network error coefficient: {}", network.error_coefficient());
}
