//! 课表分组（纯函数，输入行已按展示顺序排好）

use std::collections::HashMap;

use crate::models::catalog::responses::{CourseScheduleGroup, SectionScheduleGroup, TimeRange};
use crate::storage::ScheduleRow;

/// 教师所在教室，未分配教师时为 "TBA"
pub fn room_of(row: &ScheduleRow) -> String {
    row.professor
        .as_ref()
        .map(|p| p.room.clone())
        .filter(|room| !room.is_empty())
        .unwrap_or_else(|| "TBA".to_string())
}

fn clock(time: chrono::NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// 按班级分组某门课程的时段
///
/// 同一班级的 MIS 码以逗号拼接，作为一次选择提交。
pub fn group_by_section(rows: &[ScheduleRow]) -> Vec<SectionScheduleGroup> {
    let mut index: HashMap<i64, usize> = HashMap::new();
    let mut groups: Vec<(SectionScheduleGroup, Vec<String>, Vec<String>, Vec<String>)> = Vec::new();

    for row in rows {
        let position = *index.entry(row.section.id).or_insert_with(|| {
            groups.push((
                SectionScheduleGroup {
                    mis_code: String::new(),
                    display: String::new(),
                    section: row.section.name.clone(),
                    day: String::new(),
                    time: String::new(),
                    raw_days: Vec::new(),
                    raw_times: Vec::new(),
                    room: room_of(row),
                    course_code: row.course.code.clone(),
                    course_name: row.course.name.clone(),
                },
                Vec::new(),
                Vec::new(),
                Vec::new(),
            ));
            groups.len() - 1
        });

        let (group, codes, days, times) = &mut groups[position];
        let start = clock(row.schedule.start_time);
        let end = clock(row.schedule.end_time);
        codes.push(row.schedule.mis_code.clone());
        days.push(row.schedule.day.to_string());
        times.push(format!("{start}-{end}"));
        group.raw_days.push(row.schedule.day);
        group.raw_times.push(TimeRange { start, end });

        if group.display.is_empty() {
            group.display = match &row.program_code {
                Some(program) => format!("{program} {}", row.section.name),
                None => row.section.name.clone(),
            };
        }
    }

    groups
        .into_iter()
        .map(|(mut group, codes, days, times)| {
            let combined = days
                .iter()
                .zip(&times)
                .map(|(day, time)| format!("{day} {time}"))
                .collect::<Vec<_>>()
                .join(" | ");
            group.display = format!("{} | {} | {}", group.display, combined, group.room);
            group.mis_code = codes.join(",");
            group.day = days.join(", ");
            group.time = times.join(", ");
            group
        })
        .collect()
}

/// 按 (课程, 班级) 分组，供管理端课表列表使用
pub fn group_by_course_section(rows: &[ScheduleRow]) -> Vec<CourseScheduleGroup> {
    let mut index: HashMap<(String, i64), usize> = HashMap::new();
    let mut groups: Vec<CourseScheduleGroup> = Vec::new();

    for row in rows {
        let key = (row.course.code.clone(), row.section.id);
        let position = *index.entry(key).or_insert_with(|| {
            groups.push(CourseScheduleGroup {
                mis_codes: Vec::new(),
                course_code: row.course.code.clone(),
                course_name: row.course.name.clone(),
                year_level: row.course.year_level,
                semester: row.course.semester,
                section: row.section.name.clone(),
                professor: row.professor.as_ref().map(|p| p.full_name()),
                room: room_of(row),
                days_times: Vec::new(),
            });
            groups.len() - 1
        });

        let group = &mut groups[position];
        group.mis_codes.push(row.schedule.mis_code.clone());
        group.days_times.push(row.schedule.day_time());
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::catalog::entities::{
        Course, Professor, Schedule, Section, Semester, Weekday, YearLevel,
    };
    use chrono::NaiveTime;

    fn course(code: &str) -> Course {
        Course {
            code: code.to_string(),
            name: format!("{code} name"),
            year_level: YearLevel::First,
            semester: Semester::First,
            units: 3,
            lec_hours: 2,
            lab_hours: 3,
            program_id: None,
            professor_id: Some(1),
            remarks: None,
            prerequisites: Vec::new(),
        }
    }

    fn row(mis: &str, code: &str, section_id: i64, day: Weekday, start: u32) -> ScheduleRow {
        ScheduleRow {
            schedule: Schedule {
                mis_code: mis.to_string(),
                section_id,
                course_code: code.to_string(),
                day,
                start_time: NaiveTime::from_hms_opt(start, 0, 0).unwrap(),
                end_time: NaiveTime::from_hms_opt(start + 2, 0, 0).unwrap(),
            },
            course: course(code),
            section: Section {
                id: section_id,
                name: format!("1-{section_id}"),
                capacity: 40,
                program_id: None,
                year_level: YearLevel::First,
            },
            program_code: Some("BSIT".to_string()),
            professor: Some(Professor {
                id: 1,
                first_name: "Maria".to_string(),
                last_name: "Santos".to_string(),
                room: "Lab 3".to_string(),
            }),
        }
    }

    #[test]
    fn test_group_by_section_joins_codes() {
        let rows = vec![
            row("AB123", "IT101", 1, Weekday::Monday, 8),
            row("CD456", "IT101", 1, Weekday::Wednesday, 8),
            row("EF789", "IT101", 2, Weekday::Tuesday, 13),
        ];

        let groups = group_by_section(&rows);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].mis_code, "AB123,CD456");
        assert_eq!(
            groups[0].display,
            "BSIT 1-1 | Monday 08:00-10:00 | Wednesday 08:00-10:00 | Lab 3"
        );
        assert_eq!(groups[0].day, "Monday, Wednesday");
        assert_eq!(groups[0].time, "08:00-10:00, 08:00-10:00");
        assert_eq!(groups[0].raw_days, vec![Weekday::Monday, Weekday::Wednesday]);
        assert_eq!(groups[1].mis_code, "EF789");
    }

    #[test]
    fn test_room_falls_back_to_tba() {
        let mut r = row("AB123", "IT101", 1, Weekday::Monday, 8);
        r.professor = None;
        r.program_code = None;
        assert_eq!(room_of(&r), "TBA");

        let groups = group_by_section(&[r]);
        assert_eq!(groups[0].display, "1-1 | Monday 08:00-10:00 | TBA");
    }

    #[test]
    fn test_group_by_course_section() {
        let rows = vec![
            row("AB123", "IT101", 1, Weekday::Monday, 8),
            row("CD456", "IT101", 1, Weekday::Friday, 10),
            row("EF789", "IT102", 1, Weekday::Monday, 13),
        ];

        let groups = group_by_course_section(&rows);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].mis_codes, vec!["AB123", "CD456"]);
        assert_eq!(
            groups[0].days_times,
            vec!["Monday 08:00-10:00", "Friday 10:00-12:00"]
        );
        assert_eq!(groups[0].professor.as_deref(), Some("Maria Santos"));
        assert_eq!(groups[1].course_code, "IT102");
    }
}
