//! Property tests for ordering, range queries and roll-up consistency

use super::*;
use crate::aggregate::Stat;
use proptest::prelude::*;

fn arb_date() -> impl Strategy<Value = CalendarDate> {
    (2017i32..2024, 1u32..=12, 1u32..=31).prop_map(|(y, m, d)| {
        let d = d.min(crate::calendar::days_in_month(y, m));
        CalendarDate::new(y, m, d).unwrap()
    })
}

fn arb_bound() -> impl Strategy<Value = DateBound> {
    (2016i32..2025, prop::option::of(1u32..=12), prop::option::of(1u32..=31)).prop_map(
        |(y, m, d)| {
            // Without a month the day resolves in January and December, both 31 days long
            let d = d.map(|d| d.min(crate::calendar::days_in_month(y, m.unwrap_or(1))));
            DateBound::new(y, m, d).unwrap()
        },
    )
}

fn build(dates: &[CalendarDate], config: IndexConfig) -> Timeline<usize> {
    let mut timeline = Timeline::with_config(|i: &usize| *i as f64, config);
    for (i, &date) in dates.iter().enumerate() {
        timeline.insert(Event::new(date, i));
    }
    timeline
}

/// Input indices stably sorted by date
fn expected_order(dates: &[CalendarDate]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..dates.len()).collect();
    order.sort_by_key(|&i| dates[i]);
    order
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn unbounded_query_is_stable_sort(dates in prop::collection::vec(arb_date(), 0..120)) {
        for config in [IndexConfig::default(), IndexConfig { seek_index: false }] {
            let timeline = build(&dates, config);
            let got: Vec<usize> = timeline.events().map(|e| *e.payload()).collect();

            prop_assert_eq!(got, expected_order(&dates));
            prop_assert_eq!(timeline.len(), dates.len());
        }
    }

    #[test]
    fn range_query_matches_filter(
        dates in prop::collection::vec(arb_date(), 0..120),
        from in prop::option::of(arb_bound()),
        to in prop::option::of(arb_bound()),
    ) {
        let criteria = TimeCriteria::new(from, to);
        let expected: Vec<usize> = expected_order(&dates)
            .into_iter()
            .filter(|&i| criteria.contains(dates[i]))
            .collect();

        for config in [IndexConfig::default(), IndexConfig { seek_index: false }] {
            let timeline = build(&dates, config);
            let got: Vec<usize> = timeline.query(&criteria).map(|e| *e.payload()).collect();
            prop_assert_eq!(&got, &expected);
        }
    }

    #[test]
    fn rollups_match_from_scratch_fold(
        dates in prop::collection::vec(arb_date(), 1..80),
        read_every in 1usize..10,
    ) {
        let mut timeline = Timeline::with_config(|v: &u32| *v as f64, IndexConfig::default());
        let mut raw: Vec<(CalendarDate, f64)> = Vec::new();

        for (i, &date) in dates.iter().enumerate() {
            let value = (i as u32 * 7) % 23;
            timeline.insert(Event::new(date, value));
            raw.push((date, value as f64));

            // Interleave reads so later inserts hit cached ancestors
            if i % read_every == 0 {
                timeline.stat(NodeSelector::All);
            }
        }

        let fold = |keep: &dyn Fn(CalendarDate) -> bool| {
            Stat::of(raw.iter().filter(|(d, _)| keep(*d)).map(|(_, v)| *v))
        };

        prop_assert_eq!(timeline.stat(NodeSelector::All), fold(&|_| true));

        for year in timeline.years() {
            let year_stat = timeline.stat(NodeSelector::Year(year));
            prop_assert_eq!(year_stat, fold(&|d| d.year() == year));

            let months: Stat = timeline
                .months(year)
                .into_iter()
                .map(|m| timeline.stat(NodeSelector::Month(year, m)))
                .sum();
            prop_assert_eq!(months, year_stat);

            let quarters: Stat = (1..=4)
                .map(|q| timeline.stat(NodeSelector::Quarter(year, q)))
                .sum();
            prop_assert_eq!(quarters, year_stat);

            let days: Stat = timeline
                .months(year)
                .into_iter()
                .flat_map(|m| timeline.days(year, m).into_iter().map(move |d| (m, d)))
                .map(|(m, d)| timeline.stat(NodeSelector::Day(year, m, d)))
                .sum();
            prop_assert_eq!(days, year_stat);
        }
    }
}
