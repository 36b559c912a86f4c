//! Human-readable (French) rendering of run-type CRON schedules.
//!
//! Only the shapes the dashboard actually schedules are recognised: fixed
//! daily times, weekday lists and ranges, monthly days, and minute or hour
//! steps. Anything else is returned verbatim so the label is never lost.

const DAYS: [&str; 7] = [
    "dimanche", "lundi", "mardi", "mercredi", "jeudi", "vendredi", "samedi",
];

/// Describe a five-field CRON expression (`min hour dom month dow`).
pub fn describe_cron(expr: &str) -> String {
    let fields: Vec<&str> = expr.split_whitespace().collect();
    let verbatim = || expr.trim().to_string();
    let [minute, hour, dom, month, dow] = fields.as_slice() else {
        return verbatim();
    };
    if *month != "*" {
        return verbatim();
    }

    // Sub-daily steps
    if *dom == "*" && *dow == "*" {
        if *minute == "*" && *hour == "*" {
            return "Toutes les minutes".to_string();
        }
        if let (Some(n), "*") = (step(minute), *hour) {
            return plural_step(n, "minute", "minutes");
        }
        if let (Some(0), Some(n)) = (number(minute, 59), step(hour)) {
            return plural_step(n, "heure", "heures");
        }
        if let (Some(m), "*") = (number(minute, 59), *hour) {
            return format!("Toutes les heures à la minute {m}");
        }
    }

    let (Some(m), Some(h)) = (number(minute, 59), number(hour, 23)) else {
        return verbatim();
    };
    let at = format!("à {h:02}:{m:02}");

    match (*dom, *dow) {
        ("*", "*") => format!("Tous les jours {at}"),
        ("*", days) => match describe_days(days) {
            Some(d) => format!("{d} {at}"),
            None => verbatim(),
        },
        (day, "*") => match number(day, 31) {
            Some(1) => format!("Le 1er de chaque mois {at}"),
            Some(d) if d > 0 => format!("Le {d} de chaque mois {at}"),
            _ => verbatim(),
        },
        _ => verbatim(),
    }
}

fn number(field: &str, max: u32) -> Option<u32> {
    field.parse::<u32>().ok().filter(|n| *n <= max)
}

fn step(field: &str) -> Option<u32> {
    field
        .strip_prefix("*/")
        .and_then(|n| n.parse::<u32>().ok())
        .filter(|n| *n > 0)
}

fn plural_step(n: u32, one: &str, many: &str) -> String {
    if n == 1 {
        format!("Toutes les {one}s")
    } else {
        format!("Toutes les {n} {many}")
    }
}

fn day_name(field: &str) -> Option<&'static str> {
    // 0 and 7 both mean Sunday.
    number(field, 7).map(|d| DAYS[(d % 7) as usize])
}

fn describe_days(field: &str) -> Option<String> {
    if field == "1-5" {
        return Some("Du lundi au vendredi".to_string());
    }
    if field == "0,6" || field == "6,0" || field == "6,7" {
        return Some("Le week-end".to_string());
    }
    if let Some((from, to)) = field.split_once('-') {
        return Some(format!("Du {} au {}", day_name(from)?, day_name(to)?));
    }
    let names = field
        .split(',')
        .map(day_name)
        .collect::<Option<Vec<_>>>()?;
    match names.as_slice() {
        [one] => Some(format!("Chaque {one}")),
        [init @ .., last] => Some(format!("Les {} et {last}", init.join(", "))),
        [] => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn daily_and_weekday_schedules() {
        assert_eq!(describe_cron("0 8 * * *"), "Tous les jours à 08:00");
        assert_eq!(describe_cron("30 7 * * 1-5"), "Du lundi au vendredi à 07:30");
        assert_eq!(describe_cron("0 9 * * 1"), "Chaque lundi à 09:00");
        assert_eq!(describe_cron("0 18 * * 5"), "Chaque vendredi à 18:00");
        assert_eq!(describe_cron("0 10 * * 0,6"), "Le week-end à 10:00");
        assert_eq!(
            describe_cron("15 12 * * 1,3,5"),
            "Les lundi, mercredi et vendredi à 12:15"
        );
        assert_eq!(describe_cron("0 9 * * 2-4"), "Du mardi au jeudi à 09:00");
        assert_eq!(describe_cron("0 9 * * 7"), "Chaque dimanche à 09:00");
    }

    #[test]
    fn monthly_schedules() {
        assert_eq!(describe_cron("0 6 1 * *"), "Le 1er de chaque mois à 06:00");
        assert_eq!(describe_cron("0 6 15 * *"), "Le 15 de chaque mois à 06:00");
    }

    #[test]
    fn step_schedules() {
        assert_eq!(describe_cron("* * * * *"), "Toutes les minutes");
        assert_eq!(describe_cron("*/15 * * * *"), "Toutes les 15 minutes");
        assert_eq!(describe_cron("0 */6 * * *"), "Toutes les 6 heures");
        assert_eq!(describe_cron("0 */1 * * *"), "Toutes les heures");
        assert_eq!(describe_cron("5 * * * *"), "Toutes les heures à la minute 5");
    }

    #[test]
    fn unrecognised_expressions_are_returned_verbatim() {
        for expr in [
            "",
            "not a cron",
            "0 8 * 1 *",
            "61 8 * * *",
            "0 25 * * *",
            "0 8 1 * 1",
            "0 8 * * 9",
            "@daily",
            "0 8 0 * *",
        ] {
            assert_eq!(describe_cron(expr), expr.trim());
        }
    }
}
