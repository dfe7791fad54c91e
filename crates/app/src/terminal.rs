use std::io::{self, BufRead, Write};

use quiz_core::model::{Question, Quiz, ScoreCard, SessionState};
use services::QuizRunner;

/// How an interactive attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Finished,
    Quit,
}

enum Input {
    Choose(usize),
    Next,
    Quit,
    Unknown,
}

fn parse_input(line: &str) -> Input {
    match line.trim() {
        "" | "n" => Input::Next,
        "q" => Input::Quit,
        other => match other.parse::<usize>() {
            Ok(n) if n > 0 => Input::Choose(n - 1),
            _ => Input::Unknown,
        },
    }
}

pub fn print_quizzes(quizzes: &[Quiz], out: &mut impl Write) -> io::Result<()> {
    if quizzes.is_empty() {
        writeln!(out, "No quizzes found. Run `quizdeck seed` to add a sample quiz.")?;
        return Ok(());
    }
    for quiz in quizzes {
        write!(
            out,
            "{:>4}  {} ({} questions",
            quiz.id(),
            quiz.title(),
            quiz.question_count()
        )?;
        if let Some(minutes) = quiz.time_limit_minutes() {
            write!(out, ", {minutes} min")?;
        }
        writeln!(out, ")")?;
        if let Some(description) = quiz.description() {
            writeln!(out, "      {description}")?;
        }
    }
    Ok(())
}

fn print_question(
    runner: &QuizRunner,
    question: &Question,
    out: &mut impl Write,
) -> io::Result<()> {
    let progress = runner.progress();
    writeln!(
        out,
        "\n[{}/{}] {} ({} pt)",
        progress.position,
        progress.total,
        question.prompt(),
        question.points()
    )?;
    for (i, answer) in question.answers().iter().enumerate() {
        writeln!(out, "  {}. {}", i + 1, answer.text())?;
    }
    Ok(())
}

fn print_score(score: &ScoreCard, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "\nQuiz completed!")?;
    writeln!(
        out,
        "Your score: {:.2}% ({}/{} points, {}/{} correct)",
        score.percent(),
        score.earned_points,
        score.total_points,
        score.correct,
        score.total_questions
    )?;
    if score.is_celebration() {
        writeln!(out, "Great job!")?;
    }
    Ok(())
}

/// Drive `runner` from line-based input until it completes or the user quits.
///
/// Input: an answer number selects (and may be changed), `n` or an empty line
/// moves on, `q` quits.
pub fn run_attempt(
    runner: &mut QuizRunner,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<Outcome, Box<dyn std::error::Error>> {
    if let Some(quiz) = runner.quiz() {
        writeln!(out, "== {} ==", quiz.title())?;
        if let Some(deadline) = runner.deadline() {
            writeln!(out, "Time limit ends at {}", deadline.format("%H:%M:%S UTC"))?;
        }
    }

    let mut shown: Option<usize> = None;
    loop {
        if runner.session().state() == SessionState::Completed {
            print_score(&runner.session().score_card(), out)?;
            return Ok(Outcome::Finished);
        }

        let index = runner.session().current_index();
        if shown != Some(index) {
            match runner.current_question() {
                Some(question) => print_question(runner, question, out)?,
                None => writeln!(out, "\nThis quiz has no questions.")?,
            }
            shown = Some(index);
        }

        write!(out, "answer (1-n), n for next, q to quit: ")?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(Outcome::Quit);
        }

        match parse_input(&line) {
            Input::Choose(choice) => {
                let valid = runner
                    .current_question()
                    .is_some_and(|q| choice < q.answers().len());
                if valid {
                    runner.answer_current(choice)?;
                } else {
                    writeln!(out, "No such answer.")?;
                }
            }
            Input::Next => {
                runner.advance()?;
            }
            Input::Quit => {
                writeln!(out, "Quitting early.")?;
                return Ok(Outcome::Quit);
            }
            Input::Unknown => writeln!(out, "Unrecognised input.")?,
        }
    }
}
