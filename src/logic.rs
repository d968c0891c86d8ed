use itertools::Itertools;
use varisat::Lit;

/// Exactly one of `lits` holds.
pub(crate) fn exactly_one(lits: &[Lit]) -> Vec<Vec<Lit>> {
    let mut clauses = Vec::with_capacity(lits.len() * (lits.len() + 1) / 2 + 1);

    // no two are true; (!A + !B) * (!A + !C) * ...
    clauses.extend(lits.iter()
        .tuple_combinations()
        .map(|(a, b)| vec![!*a, !*b])
    );
    // at least one is true; A + B + C + ...
    clauses.push(lits.to_vec());

    clauses
}

/// `target` holds exactly when both `a` and `b` do.
pub(crate) fn equivalent_to_both(target: Lit, a: Lit, b: Lit) -> Vec<Vec<Lit>> {
    // T => AB = (!T + A)(!T + B)
    // AB => T = !A + !B + T
    vec![
        vec![!target, a],
        vec![!target, b],
        vec![target, !a, !b],
    ]
}

/// If `premise` holds then exactly two of `lits` hold. When `premise` fails, nothing is said.
///
/// Each of `lits` is expected to imply `premise` already.
pub(crate) fn implies_exactly_two(premise: Lit, lits: &[Lit]) -> Vec<Vec<Lit>> {
    let mut clauses = Vec::new();

    // P => at least one: !P + A + B + ...
    clauses.push(std::iter::once(!premise).chain(lits.iter().copied()).collect_vec());

    // any one of them implies another: !A + B + C + ...
    clauses.extend((0..lits.len()).map(|chosen| {
        lits.iter()
            .enumerate()
            .map(|(index, lit)| if index == chosen { !*lit } else { *lit })
            .collect_vec()
    }));

    // no three: for every triple, one fails
    clauses.extend(lits.iter()
        .tuple_combinations()
        .map(|(a, b, c)| vec![!*a, !*b, !*c])
    );

    clauses
}
