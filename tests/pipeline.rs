use dotstrata::config::{PairConfig, SimConfig};
use dotstrata::data::table::ItemTable;
use dotstrata::data::value::FieldValue;
use dotstrata::output::rows_for_pair;
use dotstrata::sim::level::{build_levels, AxisPair, LevelPolicy};
use dotstrata::sim::relax::RelaxParams;
use dotstrata::sim::runner::run_all_pairs;
use dotstrata::sim::scale::{Scale, Transform};

fn numbers(values: &[f64]) -> Vec<FieldValue> {
    values.iter().map(|&v| FieldValue::Number(v)).collect()
}

fn identity_scale(field: &str, extent: (f64, f64)) -> Scale {
    Scale::new(field, extent, extent, Transform::Identity).unwrap()
}

fn policy(zoom_levels: u32) -> LevelPolicy {
    LevelPolicy {
        zoom_levels,
        base_radius: 1.0,
        relax: RelaxParams {
            steps: 20,
            dt: 0.1,
            damping: 0.01,
            force: 0.1,
        },
        grouping_bias: 0.5,
        radius_step: 25.0,
        radius_cap: 100.0,
        min_fullness: 0.1,
        jitter: 0.001,
        seed: 42,
        pin_field: "nominations".to_string(),
    }
}

fn pair(x: &str, y: &str) -> AxisPair {
    AxisPair {
        x: x.into(),
        y: y.into(),
        pin_awarded: false,
    }
}

#[test]
fn close_pair_merges_and_outlier_survives() {
    let table = ItemTable::from_columns(vec![
        ("x", numbers(&[0.0, 1.0, 100.0])),
        ("y", numbers(&[0.0, 0.0, 0.0])),
        ("nominations", numbers(&[0.0, 0.0, 0.0])),
    ]);
    let sx = identity_scale("x", (0.0, 100.0));
    let sy = identity_scale("y", (-1.0, 1.0));
    let levels = build_levels(&table, &pair("x", "y"), &sx, &sy, &policy(2)).unwrap();

    assert_eq!(levels.len(), 2);
    assert_eq!(levels[0].len(), 3);
    assert_eq!(levels[1].len(), 2, "expected one merge plus one pass-through");

    let merged = levels[1]
        .iter()
        .find(|d| d.members().len() == 2)
        .expect("two close dots should merge");
    assert_eq!(merged.members(), &[0, 1]);

    let lone = levels[1]
        .iter()
        .find(|d| d.members().len() == 1)
        .expect("outlier passes through");
    assert_eq!(lone.members(), &[2]);
}

#[test]
fn single_item_is_alone_at_every_depth() {
    let table = ItemTable::from_columns(vec![
        ("x", numbers(&[7.0])),
        ("y", numbers(&[3.0])),
        ("nominations", numbers(&[0.0])),
    ]);
    let sx = identity_scale("x", (0.0, 10.0));
    let sy = identity_scale("y", (0.0, 10.0));
    let levels = build_levels(&table, &pair("x", "y"), &sx, &sy, &policy(4)).unwrap();

    assert_eq!(levels.len(), 4);
    for level in &levels {
        assert_eq!(level.len(), 1);
        assert_eq!(level[0].members(), &[0]);
    }
}

#[test]
fn empty_table_produces_no_rows() {
    let table = ItemTable::from_columns(vec![
        ("x", Vec::new()),
        ("y", Vec::new()),
        ("nominations", Vec::new()),
    ]);
    let sx = identity_scale("x", (0.0, 1.0));
    let sy = identity_scale("y", (0.0, 1.0));
    let p = pair("x", "y");
    let levels = build_levels(&table, &p, &sx, &sy, &policy(5)).unwrap();
    assert_eq!(levels.len(), 1);
    assert!(rows_for_pair(&p, &levels).is_empty());
}

fn movie_table() -> ItemTable {
    let released: Vec<FieldValue> = [
        "June 13, 1980",
        "July 2, 1982",
        "May 25, 1984",
        "March 1, 1990",
        "October 14, 1994",
        "December 19, 1997",
        "March 31, 1999",
        "May 16, 2003",
    ]
    .iter()
    .map(|s| FieldValue::parse(s))
    .collect();
    ItemTable::from_columns(vec![
        ("released", released),
        (
            "budget",
            numbers(&[19e6, 28e6, 18e6, 25e6, 8e6, 200e6, 63e6, 150e6]),
        ),
        ("score", numbers(&[8.4, 7.9, 8.3, 6.5, 8.9, 7.9, 8.7, 7.2])),
        ("nominations", numbers(&[1.0, 2.0, 0.0, 0.0, 7.0, 14.0, 4.0, 0.0])),
    ])
}

fn movie_config() -> SimConfig {
    SimConfig {
        zoom_levels: 3,
        pairs: vec![
            PairConfig {
                x: "released".to_string(),
                y: "budget".to_string(),
                pin_awarded: false,
            },
            PairConfig {
                x: "released".to_string(),
                y: "score".to_string(),
                pin_awarded: true,
            },
        ],
        ..SimConfig::default()
    }
}

#[test]
fn full_run_emits_every_level_with_unique_ordinals() {
    let table = movie_table();
    let cfg = movie_config();
    let rows = run_all_pairs(&table, &cfg).unwrap();
    assert!(!rows.is_empty());

    for pair_cfg in &cfg.pairs {
        for level in 0..cfg.zoom_levels {
            let group: Vec<_> = rows
                .iter()
                .filter(|r| r.level == level && r.x_axis == pair_cfg.x && r.y_axis == pair_cfg.y)
                .collect();
            assert!(
                !group.is_empty(),
                "no rows for level {level} of {}/{}",
                pair_cfg.x,
                pair_cfg.y
            );
            let mut ordinals: Vec<usize> = group.iter().map(|r| r.ordinal).collect();
            ordinals.sort_unstable();
            assert_eq!(
                ordinals,
                (0..group.len()).collect::<Vec<_>>(),
                "ordinals must be dense within a level"
            );

            // Partition: every item appears exactly once per level.
            let mut items: Vec<usize> = group
                .iter()
                .flat_map(|r| {
                    r.members
                        .split(' ')
                        .filter(|s| !s.is_empty())
                        .map(|s| s.parse::<usize>().unwrap())
                        .collect::<Vec<_>>()
                })
                .collect();
            items.sort_unstable();
            assert_eq!(items, (0..table.len()).collect::<Vec<_>>());
        }
    }
}

#[test]
fn runs_are_reproducible_for_a_seed() {
    let table = movie_table();
    let cfg = movie_config();
    let a = run_all_pairs(&table, &cfg).unwrap();
    let b = run_all_pairs(&table, &cfg).unwrap();
    assert_eq!(a.len(), b.len());
    for (ra, rb) in a.iter().zip(&b) {
        assert_eq!(ra.level, rb.level);
        assert_eq!(ra.ordinal, rb.ordinal);
        assert_eq!(ra.members, rb.members);
        assert_eq!(ra.x.to_bits(), rb.x.to_bits(), "positions must match exactly");
        assert_eq!(ra.y.to_bits(), rb.y.to_bits());
    }
}

#[test]
fn pinned_pair_keeps_nominated_movies_individual() {
    let table = movie_table();
    let cfg = movie_config();
    let rows = run_all_pairs(&table, &cfg).unwrap();
    // Pair 1 pins nominated movies; items 0, 1, 4, 5, 6 have nominations.
    for r in rows
        .iter()
        .filter(|r| r.y_axis == "score" && r.members.contains(' '))
    {
        for pinned in [0usize, 1, 4, 5, 6] {
            let held: Vec<usize> = r
                .members
                .split(' ')
                .map(|s| s.parse::<usize>().unwrap())
                .collect();
            assert!(
                !held.contains(&pinned),
                "nominated item {pinned} merged at level {}",
                r.level
            );
        }
    }
}
