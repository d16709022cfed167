// Copyright (c) 2018-2023  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Materialization of templated scenarios.

use std::mem;

use linked_hash_map::LinkedHashMap;
use tracing::trace;

use crate::{
    scenario::{OutlinePayload, Scenario, ScenarioKind},
    step::Step,
};

/// Materializes the concrete instances of the given [`Scenario`], if it
/// is templated.
///
/// For an outline, one instance per examples row is produced, in
/// declaration order, with every `<column>` placeholder of the template
/// step sentences replaced by the row's value. For a loop, `iterations`
/// structural copies of the template are produced. Instance identifiers
/// continue from the template's own identifier (`id + 0`, `id + 1`,
/// ...), keeping numbering sequential across the whole feature.
///
/// Non-template scenarios are left untouched. Calling this twice
/// replaces the previously materialized instances.
pub fn expand(scenario: &mut Scenario) {
    scenario.kind = match mem::take(&mut scenario.kind) {
        ScenarioKind::Outline(mut outline) => {
            outline.scenarios = expand_outline(scenario, &outline);
            ScenarioKind::Outline(outline)
        }
        ScenarioKind::Loop(mut r#loop) => {
            r#loop.scenarios = expand_loop(scenario, r#loop.iterations);
            ScenarioKind::Loop(r#loop)
        }
        kind @ (ScenarioKind::Plain | ScenarioKind::FromExample(_)) => kind,
    };
}

/// Materializes one [`Scenario`] per examples row of the `outline`.
fn expand_outline(
    template: &Scenario,
    outline: &OutlinePayload,
) -> Vec<Scenario> {
    outline
        .examples
        .iter()
        .enumerate()
        .map(|(row, example)| {
            let values = outline
                .header
                .iter()
                .map(String::as_str)
                .zip(example.data.iter().map(String::as_str))
                .collect::<LinkedHashMap<_, _>>();

            let mut expanded = Scenario::new(
                template.id + row as u64,
                template.keyword.clone(),
                format!("{} - row {}", template.sentence, row),
                template.path.clone(),
                template.line,
                ScenarioKind::FromExample(example.clone()),
            );
            expanded.steps = template
                .steps
                .iter()
                .map(|step| {
                    let mut materialized = Step::new(
                        step.id,
                        substitute(&step.sentence, &values),
                        step.path.clone(),
                        example.line,
                        true,
                    );
                    materialized.table = step.table.clone();
                    materialized.text = step.text.clone();
                    materialized
                })
                .collect();

            trace!(
                sentence = expanded.sentence.as_str(),
                id = expanded.id,
                "materialized outline scenario",
            );
            expanded
        })
        .collect()
}

/// Materializes `iterations` structural copies of the `template`'s
/// steps.
fn expand_loop(template: &Scenario, iterations: u64) -> Vec<Scenario> {
    (0..iterations)
        .map(|i| {
            let mut expanded = Scenario::new(
                template.id + i,
                template.keyword.clone(),
                format!("{} - iteration {}", template.sentence, i),
                template.path.clone(),
                template.line,
                ScenarioKind::Plain,
            );
            expanded.steps = template
                .steps
                .iter()
                .map(|step| {
                    let mut materialized = Step::new(
                        step.id,
                        step.sentence.clone(),
                        step.path.clone(),
                        step.line,
                        true,
                    );
                    materialized.table = step.table.clone();
                    materialized.text = step.text.clone();
                    materialized
                })
                .collect();

            trace!(
                sentence = expanded.sentence.as_str(),
                id = expanded.id,
                "materialized loop scenario",
            );
            expanded
        })
        .collect()
}

/// Replaces every `<name>` placeholder of the `sentence` with its bound
/// value.
///
/// Plain textual substitution: placeholders without a binding are left
/// as they are.
fn substitute(sentence: &str, values: &LinkedHashMap<&str, &str>) -> String {
    values.iter().fold(sentence.to_owned(), |sentence, (name, value)| {
        sentence.replace(&format!("<{}>", name), value)
    })
}

#[cfg(test)]
mod spec {
    use crate::scenario::{
        Example, LoopPayload, OutlinePayload, Scenario, ScenarioKind,
    };
    use crate::step::Step;

    use super::expand;

    fn example(cells: &[&str], line: usize) -> Example {
        Example {
            data: cells.iter().map(|c| (*c).to_owned()).collect(),
            path: "demo.feature".into(),
            line,
        }
    }

    fn outline() -> Scenario {
        let mut scenario = Scenario::new(
            3,
            "Scenario Outline",
            "Add",
            "demo.feature",
            2,
            ScenarioKind::Outline(OutlinePayload {
                header: vec!["a".to_owned(), "b".to_owned()],
                examples: vec![example(&["1", "2"], 7), example(&["3", "4"], 8)],
                ..OutlinePayload::new("Examples")
            }),
        );
        scenario.steps = vec![
            Step::new(1, "Given I have <a>", "demo.feature", 3, false),
            Step::new(2, "When I add <b>", "demo.feature", 4, false),
        ];
        scenario
    }

    #[test]
    fn outline_materializes_one_scenario_per_row() {
        let mut scenario = outline();

        expand(&mut scenario);

        let instances = scenario.instances();
        assert_eq!(instances.len(), 2);
        assert_eq!(instances[0].id, 3);
        assert_eq!(instances[0].sentence, "Add - row 0");
        assert_eq!(instances[1].id, 4);
        assert_eq!(instances[1].sentence, "Add - row 1");
    }

    #[test]
    fn outline_substitutes_placeholders_in_order() {
        let mut scenario = outline();

        expand(&mut scenario);

        let sentences = |i: usize| {
            scenario.instances()[i]
                .steps
                .iter()
                .map(|s| s.sentence.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(sentences(0), vec!["Given I have 1", "When I add 2"]);
        assert_eq!(sentences(1), vec!["Given I have 3", "When I add 4"]);
    }

    #[test]
    fn outline_keeps_unbound_placeholders() {
        let mut scenario = outline();
        scenario.steps.push(Step::new(
            3,
            "Then I see <unknown>",
            "demo.feature",
            5,
            false,
        ));

        expand(&mut scenario);

        assert_eq!(
            scenario.instances()[0].steps[2].sentence,
            "Then I see <unknown>",
        );
    }

    #[test]
    fn materialized_steps_are_runnable_and_keep_payloads() {
        let mut scenario = outline();
        scenario.steps[0].table = vec![vec!["<a>".to_owned()]];
        scenario.steps[1].text = vec!["literal <b>".to_owned()];

        expand(&mut scenario);

        let instance = &scenario.instances()[0];
        assert!(instance.steps.iter().all(|s| s.runnable));
        // Table and text content is copied verbatim, not substituted.
        assert_eq!(instance.steps[0].table, vec![vec!["<a>".to_owned()]]);
        assert_eq!(instance.steps[1].text, vec!["literal <b>".to_owned()]);
    }

    #[test]
    fn loop_materializes_iteration_copies() {
        let mut scenario = Scenario::new(
            1,
            "Scenario Loop",
            "Repeat",
            "demo.feature",
            2,
            ScenarioKind::Loop(LoopPayload::new("Iterations", 3)),
        );
        scenario.steps =
            vec![Step::new(1, "Given a pass", "demo.feature", 3, false)];

        expand(&mut scenario);

        let instances = scenario.instances();
        assert_eq!(instances.len(), 3);
        assert_eq!(instances[2].id, 3);
        assert_eq!(instances[2].sentence, "Repeat - iteration 2");
        assert!(instances.iter().all(|s| s.steps[0].runnable));
        assert_eq!(instances[0].steps[0].sentence, "Given a pass");
    }

    #[test]
    fn zero_iteration_loop_materializes_nothing() {
        let mut scenario = Scenario::new(
            1,
            "Scenario Loop",
            "Never",
            "demo.feature",
            2,
            ScenarioKind::Loop(LoopPayload::new("Iterations", 0)),
        );

        expand(&mut scenario);

        assert!(scenario.instances().is_empty());
    }
}
