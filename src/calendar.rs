use anyhow::{Context, Result};
use chrono::{Datelike, Days, Months, NaiveDate, Weekday};

/// 日付選択用のカレンダー(月表示)の状態。
///
/// 選択済みの日付は表示中の月とは独立に保持する。セルが選択済みとして扱われるのは、
/// 保存している日付と完全に一致する場合のみで、月をまたいで日(day-of-month)だけが
/// 一致する場合は選択済みとしない。
#[derive(Clone, Debug, PartialEq)]
pub struct MonthView {
    /// 表示中の月の1日。
    first: NaiveDate,
    selected: Option<NaiveDate>,
}

impl MonthView {
    /// 新しい`MonthView`を返す。
    pub fn new(year: i32, month: u32, selected: Option<NaiveDate>) -> Result<Self> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)
            .with_context(|| format!("Invalid year-month: {}-{}", year, month))?;

        Ok(Self { first, selected })
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    pub fn month(&self) -> u32 {
        self.first.month()
    }

    pub fn selected(&self) -> Option<NaiveDate> {
        self.selected
    }

    /// 次の月へ移動する。選択済みの日付は変更しない。
    pub fn next_month(&mut self) {
        if let Some(first) = self.first.checked_add_months(Months::new(1)) {
            self.first = first;
        }
    }

    /// 前の月へ移動する。選択済みの日付は変更しない。
    pub fn prev_month(&mut self) {
        if let Some(first) = self.first.checked_sub_months(Months::new(1)) {
            self.first = first;
        }
    }

    /// 日付を選択する。
    pub fn select(&mut self, date: NaiveDate) {
        self.selected = Some(date);
    }

    /// 指定したセルの日付が選択済みかどうかを返す。
    ///
    /// 保存している日付との完全一致のみを選択済みとする。
    pub fn is_selected(&self, date: NaiveDate) -> bool {
        self.selected == Some(date)
    }

    /// 表示中の月の日付を週ごとの行に並べて返す。
    ///
    /// 行の先頭は`week_starts_on`の曜日とし、月の範囲外のセルは`None`とする。
    pub fn grid(&self, week_starts_on: Weekday) -> Vec<Vec<Option<NaiveDate>>> {
        let leading = (7 + self.first.weekday().num_days_from_monday()
            - week_starts_on.num_days_from_monday())
            % 7;
        let days = self.days_in_month();

        let mut cells: Vec<Option<NaiveDate>> = vec![None; leading as usize];
        cells.extend((0..days).map(|day| self.first.checked_add_days(Days::new(day))));
        while cells.len() % 7 != 0 {
            cells.push(None);
        }

        cells.chunks(7).map(|week| week.to_vec()).collect()
    }

    fn days_in_month(&self) -> u64 {
        let next = self
            .first
            .checked_add_months(Months::new(1))
            .unwrap_or(self.first);

        next.signed_duration_since(self.first).num_days() as u64
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Weekday};
    use rstest::rstest;

    use super::MonthView;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    /// 月の移動で表示中の月だけが変わることを確認する。
    #[test]
    fn test_month_navigation() {
        let mut view = MonthView::new(2024, 3, None).unwrap();

        view.next_month();
        assert_eq!((view.year(), view.month()), (2024, 4));

        view.prev_month();
        view.prev_month();
        assert_eq!((view.year(), view.month()), (2024, 2));
    }

    /// 年をまたぐ月の移動を確認する。
    #[test]
    fn test_month_navigation_across_year() {
        let mut view = MonthView::new(2024, 12, None).unwrap();

        view.next_month();
        assert_eq!((view.year(), view.month()), (2025, 1));

        view.prev_month();
        view.prev_month();
        assert_eq!((view.year(), view.month()), (2024, 11));
    }

    /// 選択済みの3月15日が、4月の表示では4月15日を選択済みにしないことを確認する。
    #[test]
    fn test_selection_does_not_leak_into_other_months() {
        let mut view = MonthView::new(2024, 3, None).unwrap();
        view.select(date(2024, 3, 15));
        assert!(view.is_selected(date(2024, 3, 15)));

        view.next_month();
        let april_cells: Vec<NaiveDate> = view
            .grid(Weekday::Mon)
            .into_iter()
            .flatten()
            .flatten()
            .collect();
        assert!(april_cells.contains(&date(2024, 4, 15)));
        assert!(!view.is_selected(date(2024, 4, 15)));
        assert!(april_cells.iter().all(|cell| !view.is_selected(*cell)));

        // 3月へ戻ると元の選択が残っている
        view.prev_month();
        assert!(view.is_selected(date(2024, 3, 15)));
    }

    /// 月の日がすべて並び、範囲外のセルがNoneで埋まることを確認する。
    #[rstest]
    #[case::march_2024(2024, 3, Weekday::Mon, 31)]
    #[case::february_leap(2024, 2, Weekday::Mon, 29)]
    #[case::february_regular(2023, 2, Weekday::Mon, 28)]
    #[case::sunday_start(2024, 3, Weekday::Sun, 31)]
    fn test_grid_contains_every_day(
        #[case] year: i32,
        #[case] month: u32,
        #[case] week_starts_on: Weekday,
        #[case] expected_days: usize,
    ) {
        let view = MonthView::new(year, month, None).unwrap();

        let grid = view.grid(week_starts_on);

        assert!(grid.iter().all(|week| week.len() == 7));
        let days: Vec<NaiveDate> = grid.into_iter().flatten().flatten().collect();
        assert_eq!(days.len(), expected_days);
        assert_eq!(days[0], date(year, month, 1));
    }

    /// 週の開始曜日に合わせて先頭の詰め物が変わることを確認する。
    #[test]
    fn test_grid_respects_week_start() {
        // 2024-03-01は金曜日
        let view = MonthView::new(2024, 3, None).unwrap();

        let monday_grid = view.grid(Weekday::Mon);
        assert_eq!(monday_grid[0].iter().filter(|cell| cell.is_none()).count(), 4);

        let sunday_grid = view.grid(Weekday::Sun);
        assert_eq!(sunday_grid[0].iter().filter(|cell| cell.is_none()).count(), 5);
    }

    /// 不正な月の指定はエラーになることを確認する。
    #[test]
    fn test_invalid_month_is_rejected() {
        assert!(MonthView::new(2024, 13, None).is_err());
    }
}
