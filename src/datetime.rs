use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

#[cfg(not(test))]
/// 現在のUTC時間を取得する。
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// 日時の文字列を解釈する。
///
/// RFC3339形式、または`YYYY-MM-DDTHH:MM`形式(Localタイムゾーン)を受け付ける。
pub fn parse_local_datetime(s: &str) -> Result<DateTime<Utc>> {
    if let Ok(datetime) = DateTime::parse_from_rfc3339(s) {
        return Ok(datetime.to_utc());
    }

    let naive_datetime = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M")
        .with_context(|| format!("Failed to parse datetime: {}", s))?;
    let datetime = Local
        .from_local_datetime(&naive_datetime)
        .single()
        .context("Failed to convert to DateTime<Local>")?
        .to_utc();

    Ok(datetime)
}

/// `YYYY-MM-DD`形式の文字列を日付として解釈する。
pub fn parse_naive_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").with_context(|| format!("Failed to parse date: {}", s))
}

/// `YYYY-MM`形式の文字列を年と月の組として解釈する。
pub fn parse_year_month(s: &str) -> Result<(i32, u32)> {
    let target_date = s.to_string() + "-01";
    let naive_date = NaiveDate::parse_from_str(&target_date, "%Y-%m-%d")
        .with_context(|| format!("Failed to parse month: {}", s))?;

    Ok((
        chrono::Datelike::year(&naive_date),
        chrono::Datelike::month(&naive_date),
    ))
}


#[cfg(test)]
pub use mock_datetime::now;

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Local, SecondsFormat, TimeZone, Utc};
    use rstest::rstest;

    use super::mock_datetime;
    use super::parse_local_datetime;
    use super::parse_naive_date;
    use super::parse_year_month;

    /// 何も設定しない場合は、現在時間が取得できることを確認する。
    ///
    ///  - 現在時刻での比較を行なっているため、ミリ秒単位まで比較するとテストが失敗する可能性があり、秒単位で比較している。
    #[test]
    fn test_now() {
        assert_eq!(
            mock_datetime::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
        );
    }

    /// モック時間を設定した時に、その時間が取得できることを確認する。
    #[test]
    fn test_now_specific_datetime() {
        let datetime = String::from("2024-03-15T00:00:00+00:00");
        mock_datetime::set_mock_time(
            DateTime::parse_from_rfc3339(datetime.as_str())
                .unwrap()
                .to_utc(),
        );

        assert_eq!(mock_datetime::now().to_rfc3339(), datetime);

        mock_datetime::clear_mock_time();
    }

    /// RFC3339形式の日時が解釈できることを確認する。
    #[rstest]
    #[case::utc("2024-03-15T10:30:00Z", Utc.with_ymd_and_hms(2024, 3, 15, 10, 30, 0).unwrap())]
    #[case::offset("2024-03-16T02:00:00+13:00", Utc.with_ymd_and_hms(2024, 3, 15, 13, 0, 0).unwrap())]
    fn test_parse_rfc3339_datetime(#[case] input: &str, #[case] expected: DateTime<Utc>) {
        assert_eq!(parse_local_datetime(input).unwrap(), expected);
    }

    /// Localタイムゾーンの短い形式が解釈できることを確認する。
    #[test]
    fn test_parse_short_datetime_in_local() {
        let expected = Local.with_ymd_and_hms(2024, 3, 15, 10, 30, 0).unwrap();

        assert_eq!(parse_local_datetime("2024-03-15T10:30").unwrap(), expected);
    }

    /// 不正な日時はエラーになることを確認する。
    #[rstest]
    #[case::garbage("not-a-datetime")]
    #[case::date_only("2024-03-15")]
    fn test_parse_invalid_datetime(#[case] input: &str) {
        assert!(parse_local_datetime(input).is_err());
    }

    /// 日付と年月の解釈を確認する。
    #[test]
    fn test_parse_naive_date_and_year_month() {
        assert_eq!(
            parse_naive_date("2024-03-15").unwrap(),
            chrono::NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
        );
        assert_eq!(parse_year_month("2024-03").unwrap(), (2024, 3));
        assert!(parse_naive_date("2024-13-01").is_err());
        assert!(parse_year_month("2024-13").is_err());
    }
}
