use anyhow::Result;
use joinstat::access::{ColumnInfo, DataType, Schema, Tuple, Value};
use joinstat::executor::{
    collect_tuples, Executor, ExecutorError, FilterExecutor, HashJoinExecutor, Operator,
    ValuesExecutor,
};
use joinstat::expression::{ComparisonOp, JoinPredicate, Predicate};
use joinstat::statistics::{ColumnStatistics, IntHistogram};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn keyed_schema(prefix: &str) -> Schema {
    Schema::new(vec![
        ColumnInfo::new(format!("{}_key", prefix), DataType::Int32),
        ColumnInfo::new(format!("{}_payload", prefix), DataType::Varchar),
        ColumnInfo::new(format!("{}_n", prefix), DataType::Int32),
    ])
}

fn random_rows(rng: &mut StdRng, count: usize, keys: i32) -> Vec<Vec<Value>> {
    (0..count)
        .map(|i| {
            let key = if rng.gen_bool(0.05) {
                Value::Null
            } else {
                Value::Int32(rng.gen_range(0..keys))
            };
            vec![key, Value::String(format!("p{}", i)), Value::Int32(i as i32)]
        })
        .collect()
}

/// Reference result: the cross product filtered by the predicate
fn nested_loop_join(
    left: &[Vec<Value>],
    right: &[Vec<Value>],
    predicate: &JoinPredicate,
) -> Result<Vec<Vec<Value>>> {
    let mut out = Vec::new();
    for r in right {
        let r = Tuple::new(r.clone());
        for l in left {
            let l = Tuple::new(l.clone());
            if predicate.filter(&l, &r)? {
                out.push(Tuple::merge(&l, &r).into_values());
            }
        }
    }
    Ok(out)
}

fn hash_join(
    left: Vec<Vec<Value>>,
    right: Vec<Vec<Value>>,
    predicate: JoinPredicate,
) -> Result<impl Executor> {
    let join = HashJoinExecutor::new(
        predicate,
        Box::new(ValuesExecutor::new(keyed_schema("l"), left)?),
        Box::new(ValuesExecutor::new(keyed_schema("r"), right)?),
    )?;
    Ok(join.into_executor())
}

fn values_of(tuples: Vec<Tuple>) -> Vec<Vec<Value>> {
    tuples.into_iter().map(Tuple::into_values).collect()
}

#[test]
fn test_join_matches_nested_loop_reference() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(42);

    let cases = [(0, 10, 3), (10, 0, 3), (40, 60, 5), (100, 80, 50), (7, 7, 1)];
    for (left_count, right_count, keys) in cases {
        let left = random_rows(&mut rng, left_count, keys);
        let right = random_rows(&mut rng, right_count, keys);
        let predicate = JoinPredicate::equals(0, 0);

        let expected = nested_loop_join(&left, &right, &predicate)?;

        let mut join = hash_join(left, right, predicate)?;
        join.open()?;
        let actual = values_of(collect_tuples(&mut join)?);

        // Probe-major order with build order inside each bucket is exactly
        // the nested-loop order with the right side outermost
        assert_eq!(actual, expected);
    }
    Ok(())
}

#[test]
fn test_join_rewind_idempotent() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(3);
    let left = random_rows(&mut rng, 30, 4);
    let right = random_rows(&mut rng, 30, 4);

    let mut join = hash_join(left, right, JoinPredicate::equals(0, 0))?;
    join.open()?;
    let first = collect_tuples(&mut join)?;
    assert!(!first.is_empty());

    for partial in 0..5 {
        join.rewind()?;
        for _ in 0..partial {
            join.next()?;
        }
        join.rewind()?;
        assert_eq!(collect_tuples(&mut join)?, first);
    }
    Ok(())
}

#[test]
fn test_scenario_multi_match() -> Result<()> {
    let schema = Schema::new(vec![
        ColumnInfo::new("id", DataType::Int32),
        ColumnInfo::new("s", DataType::Varchar),
    ]);
    let text = |s: &str| Value::String(s.to_string());

    let left = ValuesExecutor::new(
        schema.clone(),
        vec![
            vec![Value::Int32(1), text("a")],
            vec![Value::Int32(1), text("b")],
            vec![Value::Int32(2), text("c")],
        ],
    )?;
    let right = ValuesExecutor::new(
        schema,
        vec![vec![Value::Int32(1), text("x")], vec![Value::Int32(3), text("y")]],
    )?;

    let mut join =
        HashJoinExecutor::new(JoinPredicate::equals(0, 0), Box::new(left), Box::new(right))?
            .into_executor();
    join.open()?;

    assert_eq!(
        values_of(collect_tuples(&mut join)?),
        vec![
            vec![Value::Int32(1), text("a"), Value::Int32(1), text("x")],
            vec![Value::Int32(1), text("b"), Value::Int32(1), text("x")],
        ]
    );
    Ok(())
}

#[test]
fn test_scenario_empty_build_side() -> Result<()> {
    let right = (0..5)
        .map(|i| vec![Value::Int32(i), Value::String("r".to_string()), Value::Int32(i)])
        .collect();
    let mut join = hash_join(vec![], right, JoinPredicate::equals(0, 0))?;
    join.open()?;

    assert!(!join.has_next()?);
    assert!(matches!(
        join.next().unwrap_err().downcast_ref::<ExecutorError>(),
        Some(ExecutorError::NoMoreTuples { .. })
    ));
    Ok(())
}

#[test]
fn test_join_schema_is_concatenation() -> Result<()> {
    let join = hash_join(vec![], vec![], JoinPredicate::equals(0, 2))?;

    let schema = join.output_schema();
    assert_eq!(schema.len(), 6);
    let names: Vec<_> = schema.columns().iter().filter_map(|c| c.name()).collect();
    assert_eq!(
        names,
        vec!["l_key", "l_payload", "l_n", "r_key", "r_payload", "r_n"]
    );
    Ok(())
}

#[test]
fn test_filtered_join_pipeline() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(11);
    let left = random_rows(&mut rng, 50, 6);
    let right = random_rows(&mut rng, 50, 6);

    // Keep only the right rows with n >= 25 before probing
    let keep = Predicate::new(2, ComparisonOp::Ge, Value::Int32(25));
    let filtered_right: Vec<_> = right
        .iter()
        .filter(|row| keep.filter(&Tuple::new((*row).clone())).unwrap_or(false))
        .cloned()
        .collect();
    let expected = nested_loop_join(&left, &filtered_right, &JoinPredicate::equals(0, 0))?;

    let probe = FilterExecutor::new(
        Box::new(ValuesExecutor::new(keyed_schema("r"), right)?),
        keep,
    )?
    .into_executor();
    let mut join = HashJoinExecutor::new(
        JoinPredicate::equals(0, 0),
        Box::new(ValuesExecutor::new(keyed_schema("l"), left)?),
        Box::new(probe),
    )?
    .into_executor();
    join.open()?;

    assert_eq!(values_of(collect_tuples(&mut join)?), expected);
    Ok(())
}

#[test]
fn test_join_of_joins() -> Result<()> {
    let schema = |name: &str| Schema::new(vec![ColumnInfo::new(name, DataType::Int32)]);
    let ints = |xs: &[i32]| xs.iter().map(|x| vec![Value::Int32(*x)]).collect::<Vec<_>>();

    let inner = HashJoinExecutor::new(
        JoinPredicate::equals(0, 0),
        Box::new(ValuesExecutor::new(schema("a"), ints(&[1, 2, 2, 3]))?),
        Box::new(ValuesExecutor::new(schema("b"), ints(&[2, 3, 4]))?),
    )?
    .into_executor();

    // The inner join is the build side, so it must rewind correctly
    let mut outer = HashJoinExecutor::new(
        JoinPredicate::equals(1, 0),
        Box::new(inner),
        Box::new(ValuesExecutor::new(schema("c"), ints(&[3, 2]))?),
    )?
    .into_executor();
    outer.open()?;

    let rows = values_of(collect_tuples(&mut outer)?);
    let int = Value::Int32;
    assert_eq!(
        rows,
        vec![
            vec![int(3), int(3), int(3)],
            vec![int(2), int(2), int(2)],
            vec![int(2), int(2), int(2)],
        ]
    );
    assert_eq!(outer.output_schema().len(), 3);
    Ok(())
}

#[test]
fn test_histogram_uniform_scenario() -> Result<()> {
    let mut hist = IntHistogram::new(10, 0, 99)?;
    for v in (0..100).step_by(2) {
        hist.add(v)?;
    }

    let eq = hist.estimate_selectivity(ComparisonOp::Eq, 4);
    assert!(eq > 0.0 && eq <= 0.02, "= 4 estimated {}", eq);
    assert!((hist.estimate_selectivity(ComparisonOp::Lt, 50) - 0.5).abs() < 1e-9);
    Ok(())
}

#[test]
fn test_histogram_properties() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(99);
    let (min, max) = (-1000, 1000);
    let mut hist = IntHistogram::new(37, min, max)?;
    for _ in 0..2000 {
        let v = if rng.gen_bool(0.5) {
            rng.gen_range(min..=min + 40)
        } else {
            rng.gen_range(min..=max)
        };
        hist.add(v)?;
    }

    assert_eq!(hist.estimate_selectivity(ComparisonOp::Lt, min), 0.0);
    assert_eq!(hist.estimate_selectivity(ComparisonOp::Gt, max), 0.0);
    assert_eq!(hist.estimate_selectivity(ComparisonOp::Ge, min), 1.0);
    assert_eq!(hist.estimate_selectivity(ComparisonOp::Le, max), 1.0);

    let mut prev = 0.0;
    for v in (min - 10)..=(max + 10) {
        let le = hist.estimate_selectivity(ComparisonOp::Le, v);
        assert!(le >= prev, "<= not monotone at {}", v);
        prev = le;

        let eq = hist.estimate_selectivity(ComparisonOp::Eq, v);
        let ne = hist.estimate_selectivity(ComparisonOp::Ne, v);
        assert!((eq + ne - 1.0).abs() < 1e-9);

        for op in ComparisonOp::ALL {
            let s = hist.estimate_selectivity(op, v);
            assert!((0.0..=1.0).contains(&s), "{} {} gave {}", op, v, s);
        }
    }
    assert_eq!(hist.avg_selectivity(), 1.0);
    Ok(())
}

#[test]
fn test_statistics_from_join_output() -> Result<()> {
    let left = (0..20)
        .map(|i| vec![Value::Int32(i % 4), Value::String("l".to_string()), Value::Int32(i)])
        .collect();
    let right = (0..4)
        .map(|i| vec![Value::Int32(i), Value::String("r".to_string()), Value::Int32(i * 10)])
        .collect();
    let mut join = hash_join(left, right, JoinPredicate::equals(0, 0))?;

    // Column 5 is r_n: five rows each of 0, 10, 20, 30
    let stats = ColumnStatistics::collect(&mut join, 5, 4)?;
    assert_eq!(stats.row_count(), 20);
    assert_eq!(stats.null_count(), 0);
    assert_eq!(stats.estimate_selectivity(ComparisonOp::Lt, 0), 0.0);
    assert_eq!(stats.estimate_selectivity(ComparisonOp::Le, 30), 1.0);
    // Buckets of width 8 start at 0, 8, 16, 24
    assert!((stats.estimate_selectivity(ComparisonOp::Lt, 16) - 0.5).abs() < 1e-9);
    Ok(())
}
