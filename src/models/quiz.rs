use crate::error::{AppError, AppResult};
use crate::models::question::Question;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 参加资格
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Eligibility {
    /// 允许参加的院系（为空表示不限）
    #[serde(default)]
    pub departments: Vec<String>,
    /// 允许参加的年级（为空表示不限）
    #[serde(default)]
    pub years: Vec<u8>,
    /// 允许参加的班级（为空表示不限）
    #[serde(default)]
    pub sections: Vec<String>,
}

/// 调用方提供的测验元数据
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizMeta {
    pub title: String,
    pub duration_minutes: u32,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    #[serde(default)]
    pub eligibility: Eligibility,
    /// 负分制的默认扣分值；`None` 表示不启用负分
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negative_marking: Option<f64>,
}

/// 测验聚合：元数据 + 导入的题目
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    #[serde(flatten)]
    pub meta: QuizMeta,
    pub questions: Vec<Question>,
    pub total_marks: u32,
}

impl Quiz {
    /// 将解析出的题目嵌入测验
    ///
    /// 启用负分时，题目自身扣分为 0 的使用测验默认扣分值；
    /// 未启用时所有扣分值保持原样（不参与计分）。
    pub fn assemble(meta: QuizMeta, questions: Vec<Question>) -> AppResult<Self> {
        if meta.title.trim().is_empty() {
            return Err(AppError::invalid_question("测验标题为空"));
        }
        if meta.duration_minutes == 0 {
            return Err(AppError::invalid_question("测验时长必须大于 0"));
        }
        if meta.ends_at <= meta.starts_at {
            return Err(AppError::invalid_question(format!(
                "测验时间窗口无效: {} - {}",
                meta.starts_at, meta.ends_at
            )));
        }
        if questions.is_empty() {
            return Err(AppError::invalid_question("测验至少需要一道题目"));
        }

        let questions: Vec<Question> = match meta.negative_marking {
            Some(default) if default > 0.0 => questions
                .iter()
                .map(|q| {
                    if q.negative_marks() == 0.0 {
                        q.with_negative_marks(default)
                    } else {
                        q.clone()
                    }
                })
                .collect(),
            _ => questions,
        };

        let total_marks = questions.iter().map(Question::marks).sum();

        Ok(Self {
            meta,
            questions,
            total_marks,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn meta(negative_marking: Option<f64>) -> QuizMeta {
        let starts_at = Utc::now();
        QuizMeta {
            title: "Week 3".to_string(),
            duration_minutes: 30,
            starts_at,
            ends_at: starts_at + Duration::hours(1),
            eligibility: Eligibility::default(),
            negative_marking,
        }
    }

    fn question(marks: u32, negative: f64) -> Question {
        Question::new(
            "Which is prime?",
            ["4", "6", "7", "9"].map(String::from),
            2,
            marks,
            negative,
        )
        .unwrap()
    }

    #[test]
    fn applies_default_penalty_only_to_unset_questions() {
        let quiz = Quiz::assemble(meta(Some(0.25)), vec![question(1, 0.0), question(2, 1.0)]).unwrap();
        assert_eq!(quiz.questions[0].negative_marks(), 0.25);
        assert_eq!(quiz.questions[1].negative_marks(), 1.0);
        assert_eq!(quiz.total_marks, 3);
    }

    #[test]
    fn leaves_penalties_alone_without_negative_marking() {
        let quiz = Quiz::assemble(meta(None), vec![question(1, 0.0)]).unwrap();
        assert_eq!(quiz.questions[0].negative_marks(), 0.0);
    }

    #[test]
    fn rejects_inverted_time_window() {
        let mut m = meta(None);
        m.ends_at = m.starts_at - Duration::minutes(5);
        assert!(Quiz::assemble(m, vec![question(1, 0.0)]).is_err());
    }

    #[test]
    fn rejects_empty_question_list() {
        assert!(Quiz::assemble(meta(None), Vec::new()).is_err());
    }
}
