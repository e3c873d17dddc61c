#![allow(dead_code)]

use ilp_model::{Direction, Linear, LinearProblem, SolutionValues, Status, Variable};

/// maximize 17x + 12y
/// s.t. 10x + 7y <= 40, x + y <= 5, x, y >= 0 integer
pub fn knapsack() -> (LinearProblem, Variable, Variable) {
    let mut lp = LinearProblem::new();
    let x = lp.add_integer_variable("x", Some(0.0), None).unwrap();
    let y = lp.add_integer_variable("y", Some(0.0), None).unwrap();
    lp.set_objective_linear(Some(&Linear::from_slices(&[17.0, 12.0], &[x, y]).unwrap()))
        .unwrap();
    lp.set_objective_direction(Direction::Maximize);
    lp.add_constraint_with(
        "10 x + 7 y <= 40",
        Some(&Linear::from_slices(&[10.0, 7.0], &[x, y]).unwrap()),
        None,
        Some(40.0),
    )
    .unwrap();
    lp.add_constraint_with(
        "x + y <= 5",
        Some(&Linear::from_slices(&[1.0, 1.0], &[x, y]).unwrap()),
        None,
        Some(5.0),
    )
    .unwrap();
    (lp, x, y)
}

/// Stand-in for an external solver: reports the given values in column order.
pub fn report(lp: &mut LinearProblem, status: Status, objective: f64, columns: &[f64]) {
    let values = status
        .has_solution()
        .then(|| SolutionValues::new(objective, columns.to_vec()));
    lp.record_solution(status, values).unwrap();
}
