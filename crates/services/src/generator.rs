//! Builds question batches by sampling the content provider.

use std::sync::Arc;

use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};

use quest_core::model::{
    AnimeSummary, CharacterOption, GameMode, OPTION_COUNT, Question, QuestionBatch,
};

use crate::config::GeneratorConfig;
use crate::provider::ContentProvider;

/// Largest distance between a decoy episode count and the real one.
const MAX_EPISODE_OFFSET: u32 = 20;

/// Samples anime from the provider and turns them into multiple-choice questions.
#[derive(Clone)]
pub struct QuestionGenerator {
    provider: Arc<dyn ContentProvider>,
    config: GeneratorConfig,
}

impl QuestionGenerator {
    #[must_use]
    pub fn new(provider: Arc<dyn ContentProvider>) -> Self {
        Self {
            provider,
            config: GeneratorConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: GeneratorConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate up to `batch_size` questions for `level`.
    ///
    /// The level doubles as the provider page, so each level draws from a
    /// different slice of the ranking. Provider failures are logged and yield
    /// fewer questions; the result may be short or empty.
    pub async fn generate_batch<R>(&self, level: u32, mode: GameMode, rng: &mut R) -> QuestionBatch
    where
        R: Rng,
    {
        let anime = match self.provider.top_anime(level).await {
            Ok(anime) => anime,
            Err(err) => {
                log::warn!("failed to fetch top anime page {level}: {err}");
                Vec::new()
            }
        };

        let mut questions = Vec::with_capacity(self.config.batch_size);
        let mut attempts = 0;
        while questions.len() < self.config.batch_size && attempts < self.config.max_attempts {
            let Some(pick) = anime.choose(rng) else {
                break;
            };

            let question = match mode {
                GameMode::Character => self.character_question_for(pick, rng).await,
                GameMode::Episodes => episode_question(pick, rng),
            };
            match question {
                Some(question) => questions.push(question),
                None => log::debug!("skipped {} ({}) for {mode} question", pick.title, pick.id),
            }
            attempts += 1;

            let more = questions.len() < self.config.batch_size && attempts < self.config.max_attempts;
            if more && !self.config.attempt_delay.is_zero() {
                tokio::time::sleep(self.config.attempt_delay).await;
            }
        }

        if questions.len() < self.config.batch_size {
            log::info!(
                "level {level} {mode} batch is short: {} of {} after {attempts} attempts",
                questions.len(),
                self.config.batch_size
            );
        }
        QuestionBatch::new(questions)
    }

    async fn character_question_for<R>(&self, anime: &AnimeSummary, rng: &mut R) -> Option<Question>
    where
        R: Rng,
    {
        let cast = match self.provider.main_characters(anime.id).await {
            Ok(cast) => cast,
            Err(err) => {
                log::warn!("failed to fetch characters for {}: {err}", anime.id);
                return None;
            }
        };
        character_question(cast, rng)
    }
}

/// Pick one portrait and three other names from a main cast.
///
/// Needs at least four distinct names; returns `None` otherwise.
pub fn character_question<R>(cast: Vec<CharacterOption>, rng: &mut R) -> Option<Question>
where
    R: Rng,
{
    let mut distinct: Vec<CharacterOption> = Vec::with_capacity(cast.len());
    for character in cast {
        if !distinct.iter().any(|seen| seen.name == character.name) {
            distinct.push(character);
        }
    }
    if distinct.len() < OPTION_COUNT {
        return None;
    }

    distinct.shuffle(rng);
    let mut picked = distinct.into_iter().take(OPTION_COUNT);
    let correct = picked.next()?;
    let mut options: Vec<String> = std::iter::once(correct.name.clone())
        .chain(picked.map(|character| character.name))
        .collect();
    options.shuffle(rng);

    Question::character(correct.portrait_url, options, correct.name)
        .inspect_err(|err| log::debug!("discarded character question: {err}"))
        .ok()
}

/// Ask for the episode count of `anime`, with three nearby decoys.
///
/// Returns `None` when the episode count is unknown.
pub fn episode_question<R>(anime: &AnimeSummary, rng: &mut R) -> Option<Question>
where
    R: Rng,
{
    let correct = anime.known_episodes()?;
    let mut options = vec![correct];
    while options.len() < OPTION_COUNT {
        let offset = rng.random_range(1..=MAX_EPISODE_OFFSET);
        let decoy = if rng.random_bool(0.5) {
            correct.saturating_add(offset)
        } else {
            correct.saturating_sub(offset).max(1)
        };
        if !options.contains(&decoy) {
            options.push(decoy);
        }
    }
    options.shuffle(rng);

    Question::episodes(anime.title.clone(), options, correct)
        .inspect_err(|err| log::debug!("discarded episode question: {err}"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use quest_core::model::{AnimeId, Answer};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use crate::provider::StaticProvider;

    fn cast(names: &[&str]) -> Vec<CharacterOption> {
        names
            .iter()
            .map(|name| CharacterOption::new(*name, format!("https://cdn.example/{name}.jpg")))
            .collect()
    }

    fn generator(provider: StaticProvider) -> QuestionGenerator {
        QuestionGenerator::new(Arc::new(provider))
            .with_config(GeneratorConfig::default().with_attempt_delay(Duration::ZERO))
    }

    fn assert_well_formed(question: &Question) {
        let options = question.options();
        assert_eq!(options.len(), OPTION_COUNT);
        for (i, option) in options.iter().enumerate() {
            assert!(!options[..i].contains(option), "duplicate {option} in {options:?}");
        }
        assert!(options.contains(&question.correct_answer()));
    }

    #[test]
    fn episode_decoys_are_distinct_and_positive() {
        let mut rng = StdRng::seed_from_u64(7);
        for episodes in [1, 2, 12, 24, 500] {
            let anime = AnimeSummary::new(AnimeId::new(1), "Show", Some(episodes));
            for _ in 0..50 {
                let question = episode_question(&anime, &mut rng).unwrap();
                assert_well_formed(&question);
                for option in question.options() {
                    let Answer::Episodes(count) = option else {
                        panic!("episode question offered a name");
                    };
                    assert!(count >= 1);
                    assert!(count.abs_diff(episodes) <= MAX_EPISODE_OFFSET);
                }
            }
        }
    }

    #[test]
    fn unknown_episode_count_is_skipped() {
        let mut rng = StdRng::seed_from_u64(7);
        let airing = AnimeSummary::new(AnimeId::new(1), "One Piece", None);
        assert!(episode_question(&airing, &mut rng).is_none());
    }

    #[test]
    fn character_question_needs_four_distinct_names() {
        let mut rng = StdRng::seed_from_u64(3);
        assert!(character_question(cast(&["A", "B", "C"]), &mut rng).is_none());
        assert!(character_question(cast(&["A", "B", "C", "C"]), &mut rng).is_none());

        let question = character_question(cast(&["A", "B", "C", "D", "E"]), &mut rng).unwrap();
        assert_well_formed(&question);
        let Answer::Name(name) = question.correct_answer() else {
            panic!("character question answered with a number");
        };
        assert_eq!(
            question.image_url(),
            Some(format!("https://cdn.example/{name}.jpg").as_str())
        );
    }

    #[tokio::test]
    async fn generation_is_deterministic_for_a_seed() {
        let provider = StaticProvider::new().with_page(
            1,
            (1..=10)
                .map(|id| AnimeSummary::new(AnimeId::new(id), format!("Show {id}"), Some(12 * id as u32)))
                .collect(),
        );
        let generator = generator(provider);

        let first = generator
            .generate_batch(1, GameMode::Episodes, &mut StdRng::seed_from_u64(42))
            .await;
        let second = generator
            .generate_batch(1, GameMode::Episodes, &mut StdRng::seed_from_u64(42))
            .await;
        assert_eq!(first, second);
        assert_eq!(first.len(), 5);
        first.questions().iter().for_each(assert_well_formed);
    }

    #[tokio::test]
    async fn level_selects_provider_page() {
        let provider = StaticProvider::new()
            .with_page(1, vec![AnimeSummary::new(AnimeId::new(1), "Page One", Some(10))])
            .with_page(3, vec![AnimeSummary::new(AnimeId::new(3), "Page Three", Some(30))]);
        let generator = generator(provider);

        let batch = generator
            .generate_batch(3, GameMode::Episodes, &mut StdRng::seed_from_u64(1))
            .await;
        assert!(
            batch
                .questions()
                .iter()
                .all(|question| question.correct_answer() == Answer::Episodes(30))
        );
    }

    #[tokio::test]
    async fn unusable_content_exhausts_attempts() {
        let provider = StaticProvider::new()
            .with_page(1, vec![AnimeSummary::new(AnimeId::new(1), "Tiny Cast", Some(12))])
            .with_cast(AnimeId::new(1), cast(&["Only", "Two"]));
        let generator = generator(provider.clone());

        let batch = generator
            .generate_batch(1, GameMode::Character, &mut StdRng::seed_from_u64(9))
            .await;
        assert!(batch.is_empty());
        // One page fetch plus one cast fetch per attempt.
        assert_eq!(provider.calls(), 1 + 20);
    }

    #[tokio::test]
    async fn provider_failure_yields_empty_batch() {
        let provider = StaticProvider::unavailable();
        let generator = generator(provider.clone());

        let batch = generator
            .generate_batch(1, GameMode::Episodes, &mut StdRng::seed_from_u64(9))
            .await;
        assert!(batch.is_empty());
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn waits_between_attempts() {
        let provider = StaticProvider::new()
            .with_page(1, vec![AnimeSummary::new(AnimeId::new(1), "Bebop", Some(26))]);
        let generator = QuestionGenerator::new(Arc::new(provider));

        let started = tokio::time::Instant::now();
        let batch = generator
            .generate_batch(1, GameMode::Episodes, &mut StdRng::seed_from_u64(5))
            .await;
        assert_eq!(batch.len(), 5);
        // Four pauses separate five successful attempts.
        assert_eq!(started.elapsed(), Duration::from_millis(400) * 4);
    }
}
