use crate::catalog::TargetObject;

/// Format whole seconds as "m:ss".
pub fn format_time(seconds: u32) -> String {
    let mins = seconds / 60;
    let secs = seconds % 60;
    format!("{}:{:02}", mins, secs)
}

/// Share of targets found, as a percentage. Empty lists count as zero.
pub fn progress_percent(objects: &[TargetObject]) -> f64 {
    if objects.is_empty() {
        return 0.0;
    }
    let found = objects.iter().filter(|obj| obj.found).count();
    (found as f64 / objects.len() as f64) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(found: bool) -> TargetObject {
        TargetObject {
            id: 1,
            name: "taza".to_string(),
            found,
            points: 50,
        }
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0), "0:00");
        assert_eq!(format_time(9), "0:09");
        assert_eq!(format_time(60), "1:00");
        assert_eq!(format_time(125), "2:05");
        assert_eq!(format_time(3599), "59:59");
    }

    #[test]
    fn test_progress_percent_empty() {
        assert_eq!(progress_percent(&[]), 0.0);
    }

    #[test]
    fn test_progress_percent_partial() {
        let objects = vec![target(true), target(false), target(false), target(true)];
        assert_eq!(progress_percent(&objects), 50.0);
    }

    #[test]
    fn test_progress_percent_all_found() {
        let objects = vec![target(true), target(true)];
        assert_eq!(progress_percent(&objects), 100.0);
    }

    #[test]
    fn test_progress_percent_none_found() {
        let objects = vec![target(false), target(false), target(false)];
        assert_eq!(progress_percent(&objects), 0.0);
    }
}
