//! Point mutation for CGP genotypes.
//!
//! The genotype is viewed as a flat array of mutable fields:
//!
//! ```text
//! [f_0, c_0, k_0_0 .. k_0_{A-1}, f_1, c_1, .., f_{G-1}, .., o_0 .. o_{O-1}]
//! ```
//!
//! where `f` is a function selector, `c` a constant, `k` a connection and
//! `o` an output selector. Each point mutation picks one field uniformly
//! and redraws it from its valid range.
//!
//! # References
//!
//! - Miller & Thomson (2000), "Cartesian Genetic Programming"
//! - Miller (2011), *Cartesian Genetic Programming*, Springer

use super::individual::Individual;
use super::types::{CgpProblem, Gene};
use rand::Rng;

/// Produces a mutated copy of `parent`.
///
/// Applies [`CgpConfig::mutations_per_offspring`](super::CgpConfig::mutations_per_offspring)
/// independent point mutations to a deep copy of the genotype. The parent
/// is never modified. The offspring starts with fitness `+inf` and no
/// cached reachability.
///
/// A connection of the gene at logical position `p` is redrawn from
/// `[0, p)`, so the offspring stays acyclic.
pub fn mutate<P: CgpProblem, R: Rng>(parent: &Individual, problem: &P, rng: &mut R) -> Individual {
    let config = parent.config();
    let mut genes = parent.genes().to_vec();
    let mut outputs = parent.outputs().to_vec();

    let fields_per_gene = 2 + config.max_arity;
    let gene_fields = config.num_genes * fields_per_gene;

    for _ in 0..config.mutations_per_offspring() {
        let target = rng.random_range(0..config.mutable_fields());
        if target < gene_fields {
            let k = target / fields_per_gene;
            let position = config.num_inputs + k;
            mutate_gene(
                &mut genes[k],
                target % fields_per_gene,
                position,
                config.functions.len(),
                problem,
                rng,
            );
        } else {
            outputs[target - gene_fields] = rng.random_range(0..config.num_positions());
        }
    }

    Individual::from_unchecked(config.clone(), genes, outputs)
}

/// Redraws one field of a gene: 0 function, 1 constant, `2 + i` connection `i`.
fn mutate_gene<P: CgpProblem, R: Rng>(
    gene: &mut Gene,
    field: usize,
    position: usize,
    num_functions: usize,
    problem: &P,
    rng: &mut R,
) {
    match field {
        0 => gene.function = rng.random_range(0..num_functions),
        1 => gene.constant = problem.random_constant(rng),
        i => gene.connections[i - 2] = rng.random_range(0..position),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cgp::{functions, CgpConfig};
    use crate::random::create_rng;
    use proptest::prelude::*;
    use rand::Rng;
    use std::sync::Arc;

    struct UnitConst;

    impl CgpProblem for UnitConst {
        fn random_constant<R: Rng>(&self, rng: &mut R) -> f64 {
            rng.random_range(0.0..1.0)
        }
        fn evaluate(&self, _: &mut Individual) -> f64 {
            0.0
        }
    }

    fn config(inputs: usize, genes: usize, outputs: usize, rate: f64) -> Arc<CgpConfig> {
        Arc::new(
            CgpConfig::default()
                .with_num_inputs(inputs)
                .with_num_genes(genes)
                .with_num_outputs(outputs)
                .with_mutation_rate(rate)
                .with_functions(functions::standard()),
        )
    }

    fn count_differences(a: &Individual, b: &Individual) -> usize {
        let mut diff = 0;
        for (ga, gb) in a.genes().iter().zip(b.genes()) {
            diff += usize::from(ga.function != gb.function);
            diff += usize::from(ga.constant != gb.constant);
            diff += ga
                .connections
                .iter()
                .zip(&gb.connections)
                .filter(|(x, y)| x != y)
                .count();
        }
        diff + a
            .outputs()
            .iter()
            .zip(b.outputs())
            .filter(|(x, y)| x != y)
            .count()
    }

    #[test]
    fn test_parent_untouched() {
        let cfg = config(3, 20, 2, 0.5);
        let mut rng = create_rng(42);
        let parent = Individual::random(cfg, &UnitConst, &mut rng).unwrap();
        let snapshot_genes = parent.genes().to_vec();
        let snapshot_outputs = parent.outputs().to_vec();

        for _ in 0..50 {
            let _child = mutate(&parent, &UnitConst, &mut rng);
        }

        assert_eq!(parent.genes(), &snapshot_genes[..]);
        assert_eq!(parent.outputs(), &snapshot_outputs[..]);
    }

    #[test]
    fn test_offspring_is_fresh() {
        let cfg = config(2, 10, 1, 0.1);
        let mut rng = create_rng(3);
        let mut parent = Individual::random(cfg, &UnitConst, &mut rng).unwrap();
        parent.set_fitness(1.0);
        let child = mutate(&parent, &UnitConst, &mut rng);
        assert!(child.fitness().is_infinite());
        assert!(Arc::ptr_eq(child.config(), parent.config()));
    }

    #[test]
    fn test_mutation_count_bounded() {
        let cfg = config(2, 10, 2, 0.1);
        let expected = cfg.mutations_per_offspring();
        let mut rng = create_rng(11);
        let parent = Individual::random(cfg, &UnitConst, &mut rng).unwrap();

        let mut changed = 0;
        for _ in 0..100 {
            let child = mutate(&parent, &UnitConst, &mut rng);
            let diff = count_differences(&parent, &child);
            // Redraws may hit the same field or the same value
            assert!(diff <= expected, "{diff} fields changed, at most {expected} expected");
            changed += usize::from(diff > 0);
        }
        assert!(changed > 50, "mutation rarely changed anything: {changed}/100");
    }

    #[test]
    fn test_zero_genes_mutates_outputs_only() {
        let cfg = config(4, 0, 3, 1.0);
        let mut rng = create_rng(8);
        let parent = Individual::random(cfg, &UnitConst, &mut rng).unwrap();
        for _ in 0..50 {
            let child = mutate(&parent, &UnitConst, &mut rng);
            assert!(child.genes().is_empty());
            assert!(child.outputs().iter().all(|&o| o < 4));
        }
    }

    #[test]
    fn test_zero_arity_genes() {
        let cfg = Arc::new(
            CgpConfig::default()
                .with_num_genes(5)
                .with_max_arity(0)
                .with_mutation_rate(1.0)
                .with_functions(vec![functions::constant()]),
        );
        let mut rng = create_rng(2);
        let parent = Individual::random(cfg, &UnitConst, &mut rng).unwrap();
        let child = mutate(&parent, &UnitConst, &mut rng);
        assert!(child.genes().iter().all(|g| g.connections.is_empty()));
    }

    #[test]
    fn test_mutate_gene_fields() {
        let mut rng = create_rng(4);
        let mut gene = Gene {
            function: 0,
            constant: 5.0,
            connections: vec![0, 0],
        };

        mutate_gene(&mut gene, 1, 3, 4, &UnitConst, &mut rng);
        assert!((0.0..1.0).contains(&gene.constant));
        assert_eq!(gene.function, 0);

        for _ in 0..100 {
            mutate_gene(&mut gene, 3, 3, 4, &UnitConst, &mut rng);
            assert!(gene.connections[1] < 3);
            mutate_gene(&mut gene, 0, 3, 4, &UnitConst, &mut rng);
            assert!(gene.function < 4);
        }
        assert_eq!(gene.connections[0], 0);
    }

    #[test]
    fn test_same_seed_same_offspring() {
        let cfg = config(3, 15, 3, 0.2);
        let parent = Individual::random(cfg, &UnitConst, &mut create_rng(1)).unwrap();
        let a = mutate(&parent, &UnitConst, &mut create_rng(99));
        let b = mutate(&parent, &UnitConst, &mut create_rng(99));
        assert_eq!(a.genes(), b.genes());
        assert_eq!(a.outputs(), b.outputs());
    }

    proptest! {
        #[test]
        fn prop_mutation_preserves_shape_and_acyclicity(
            seed in any::<u64>(),
            inputs in 1usize..4,
            genes in 0usize..25,
            outputs in 1usize..4,
            rate in 0.0f64..=1.0,
        ) {
            let cfg = config(inputs, genes, outputs, rate);
            let mut rng = create_rng(seed);
            let mut ind = Individual::random(cfg, &UnitConst, &mut rng).unwrap();
            for _ in 0..10 {
                ind = mutate(&ind, &UnitConst, &mut rng);
                prop_assert_eq!(ind.genes().len(), genes);
                prop_assert_eq!(ind.outputs().len(), outputs);
                for (k, g) in ind.genes().iter().enumerate() {
                    prop_assert_eq!(g.connections.len(), 2);
                    prop_assert!(g.connections.iter().all(|&c| c < inputs + k));
                    prop_assert!(g.function < ind.config().functions.len());
                }
                prop_assert!(ind.outputs().iter().all(|&o| o < inputs + genes));
            }
        }
    }
}
