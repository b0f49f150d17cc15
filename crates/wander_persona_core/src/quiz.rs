//! crates/wander_persona_core/src/quiz.rs
//!
//! The static quiz question bank and the stratified sampler that builds a
//! session's question subset. Fifty Korean questions across five fixed
//! categories; the sampler guarantees every category is represented (for
//! requests of five or more), never repeats a question id, and shuffles both
//! the question order and each question's option order.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

/// Number of questions handed to a new quiz session: two per category.
pub const DEFAULT_QUESTION_COUNT: usize = 10;

/// One selectable answer. The option id survives shuffling; the orchestrator
/// only ever sees the chosen option's text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizOption {
    pub id: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    pub id: u32,
    pub text: String,
    pub options: Vec<QuizOption>,
}

/// The five fixed category id ranges (inclusive).
const CATEGORY_RANGES: [(u32, u32); 5] = [
    (1, 8),   // 여행 철학 (기본 동기와 가치관)
    (9, 20),  // 환경 선호 (자연환경과 지형 취향)
    (21, 30), // 문화 관심 (역사, 예술, 현지 교류)
    (31, 42), // 활동 성향 (신체활동, 음식, 체험)
    (43, 50), // 개인 특성 (성격, 적응력, 위험감수)
];

pub const CATEGORY_COUNT: usize = CATEGORY_RANGES.len();

type RawQuestion = (u32, &'static str, [(&'static str, &'static str); 4]);

// AI 개인성향 분석 및 현실적 여행지 추천을 위한 50개 질문
const QUESTION_BANK: &[RawQuestion] = &[
    // === 여행 철학 및 동기 (1-8번) ===
    (1, "여행에서 가장 중요하게 생각하는 가치는?", [
        ("A", "완전한 휴식과 스트레스 해소"),
        ("B", "새로운 문화와 사람들과의 교류"),
        ("C", "자신의 한계를 시험하는 모험"),
        ("D", "럭셔리하고 독특한 경험"),
    ]),
    (2, "이상적인 여행 기간은?", [
        ("A", "2-3일의 짧은 여행"),
        ("B", "일주일 정도의 여유로운 일정"),
        ("C", "2-3주의 깊이 있는 탐험"),
        ("D", "한 달 이상의 장기 체류"),
    ]),
    (3, "여행지 선택 시 가장 중요한 기준은?", [
        ("A", "편리한 교통과 접근성"),
        ("B", "독특한 자연 경관"),
        ("C", "풍부한 역사와 문화"),
        ("D", "현지 고유의 체험 활동"),
    ]),
    (4, "함께 여행하고 싶은 동반자는?", [
        ("A", "혼자만의 자유로운 여행"),
        ("B", "가족과 함께하는 따뜻한 시간"),
        ("C", "연인과의 낭만적인 순간"),
        ("D", "친구들과의 활기찬 모험"),
    ]),
    (5, "여행 계획을 세우는 스타일은?", [
        ("A", "세부 일정까지 철저히 계획"),
        ("B", "큰 틀만 정하고 현지에서 유연하게"),
        ("C", "즉흥적으로 자유롭게"),
        ("D", "전문 가이드나 현지인에게 맡김"),
    ]),
    (6, "여행에서 가장 기억에 남는 순간은?", [
        ("A", "조용한 휴식과 여유"),
        ("B", "현지인과의 진솔한 교류"),
        ("C", "예기치 않은 놀라운 발견"),
        ("D", "독특하고 특별한 경험"),
    ]),
    (7, "여행지에서 하루를 보내는 방식은?", [
        ("A", "늦게 일어나 여유롭게 시작"),
        ("B", "아침부터 활동적으로 탐험"),
        ("C", "오전에 활동, 오후에 휴식"),
        ("D", "밤늦게까지 활기찬 활동"),
    ]),
    (8, "여행의 성공을 판단하는 기준은?", [
        ("A", "몸과 마음의 완전한 재충전"),
        ("B", "새로운 배움과 경험의 풍부함"),
        ("C", "계획한 일정의 완벽한 실행"),
        ("D", "기대 이상의 특별한 만족감"),
    ]),
    // === 환경 및 자연 선호도 (9-20번) ===
    (9, "가장 마음이 편안해지는 자연 환경은?", [
        ("A", "파도 소리가 들리는 해변"),
        ("B", "새소리가 울리는 숲속"),
        ("C", "드넓은 초원과 평야"),
        ("D", "고요한 호수나 강변"),
    ]),
    (10, "선호하는 기후는 어떤 스타일인가요?", [
        ("A", "따뜻하고 햇살 가득한 열대 기후"),
        ("B", "시원하고 맑은 온대 기후"),
        ("C", "건조하고 뜨거운 사막 기후"),
        ("D", "서늘하고 청량한 고산 기후"),
    ]),
    (11, "물과 관련된 활동 중 가장 끌리는 것은?", [
        ("A", "바다에서 스노클링이나 다이빙"),
        ("B", "강에서 래프팅이나 서핑"),
        ("C", "호수에서 카약이나 패들보드"),
        ("D", "온천에서 편안한 휴식"),
    ]),
    (12, "산에서의 활동으로 가장 매력적인 것은?", [
        ("A", "정상까지 도전하는 하이킹"),
        ("B", "케이블카로 즐기는 산 정상 뷰"),
        ("C", "산속 마을에서의 현지 체험"),
        ("D", "산에서 캠핑과 별 관측"),
    ]),
    (13, "탐험해보고 싶은 독특한 지형은?", [
        ("A", "광활한 사막과 모래 언덕"),
        ("B", "신비로운 동굴과 지하 세계"),
        ("C", "울창한 열대 우림"),
        ("D", "눈 덮인 빙하와 극지방"),
    ]),
    (14, "섬 여행에서 가장 중요한 요소는?", [
        ("A", "맑고 투명한 바다"),
        ("B", "조용하고 한적한 분위기"),
        ("C", "다양한 해양 스포츠"),
        ("D", "섬 고유의 문화와 요리"),
    ]),
    (15, "야생동물과의 만남에서 기대하는 것은?", [
        ("A", "안전하게 관찰하며 사진 촬영"),
        ("B", "동물의 생태와 자연 학습"),
        ("C", "직접 교감하며 만지는 체험"),
        ("D", "희귀 동물을 발견하는 스릴"),
    ]),
    (16, "극한 환경에 대한 당신의 태도는?", [
        ("A", "도전해보고 싶은 흥미로운 경험"),
        ("B", "안전이 보장된다면 시도 가능"),
        ("C", "다큐멘터리로 보는 것만으로 충분"),
        ("D", "위험한 환경은 피하고 싶음"),
    ]),
    (17, "일출이나 일몰을 감상할 때 선호하는 장소는?", [
        ("A", "바다 위 수평선에서의 일출/일몰"),
        ("B", "산 정상에서의 장엄한 풍경"),
        ("C", "사막에서의 붉은 노을"),
        ("D", "도시 스카이라인과 어우러진 석양"),
    ]),
    (18, "자연재해나 위험에 대한 태도는?", [
        ("A", "철저한 안전 장치가 필요"),
        ("B", "기본적인 준비로 충분"),
        ("C", "모험의 일부로 받아들임"),
        ("D", "위험 지역은 여행에서 제외"),
    ]),
    (19, "계절감을 느끼는 여행의 선호도는?", [
        ("A", "따뜻한 여름 기후"),
        ("B", "사계절이 뚜렷한 지역"),
        ("C", "눈 덮인 겨울 풍경"),
        ("D", "봄꽃이나 가을 단풍"),
    ]),
    (20, "자연 속 숙박 스타일은?", [
        ("A", "텐트로 즐기는 야생 캠핑"),
        ("B", "글램핑으로 자연과 편안함 모두"),
        ("C", "에코 리조트에서 친환경 휴식"),
        ("D", "자연은 즐기되 숙소는 호텔"),
    ]),
    // === 문화 및 인문학적 관심사 (21-30번) ===
    (21, "역사적 장소 방문 시 가장 관심 있는 부분은?", [
        ("A", "고대 건축의 웅장함과 기술"),
        ("B", "과거 사람들의 생활과 이야기"),
        ("C", "중요 역사적 사건의 현장"),
        ("D", "유물과 유적의 신비로운 분위기"),
    ]),
    (22, "현지 문화 체험에서 가장 기대하는 것은?", [
        ("A", "전통 공예나 의상 체험"),
        ("B", "현지 가정에서의 식사"),
        ("C", "전통 춤이나 음악 배우기"),
        ("D", "현지 축제나 의식 참여"),
    ]),
    (23, "박물관이나 미술관에서의 관람 스타일은?", [
        ("A", "가이드 투어로 상세히 탐구"),
        ("B", "흥미로운 전시만 선택적으로"),
        ("C", "전체를 훑으며 분위기 즐기기"),
        ("D", "체험 프로그램이나 특별전 위주"),
    ]),
    (24, "현지 언어 소통에 대한 접근 방식은?", [
        ("A", "여행 전 기본 회화 학습"),
        ("B", "현지에서 간단히 배우기"),
        ("C", "앱이나 몸짓으로 소통"),
        ("D", "영어나 한국어로 가능한 곳만"),
    ]),
    (25, "종교적 장소 방문 시 태도는?", [
        ("A", "예의를 갖추며 경건히 관람"),
        ("B", "건축과 예술적 가치에 집중"),
        ("C", "현지인의 신앙을 관찰"),
        ("D", "관광지로만 인식"),
    ]),
    (26, "현지인과의 교류에서 원하는 것은?", [
        ("A", "문화에 대한 깊이 있는 대화"),
        ("B", "일상적인 가벼운 만남"),
        ("C", "현지 정보와 추천 장소"),
        ("D", "간단한 인사나 사진 촬영"),
    ]),
    (27, "전통 시장 방문의 주요 목적은?", [
        ("A", "현지인의 생활 모습 관찰"),
        ("B", "특산품과 음식 맛보기"),
        ("C", "기념품 구매"),
        ("D", "활기찬 시장 분위기 즐기기"),
    ]),
    (28, "축제 참여 방식은?", [
        ("A", "직접 참여하며 즐기기"),
        ("B", "관람하며 분위기 느끼기"),
        ("C", "사진과 영상으로 기록"),
        ("D", "축제의 역사와 의미 탐구"),
    ]),
    (29, "예술 공연 감상 시 선호하는 스타일은?", [
        ("A", "전통 예술과 민속 공연"),
        ("B", "현대적이고 실험적인 예술"),
        ("C", "클래식 음악이나 오페라"),
        ("D", "대중적이고 접근성 높은 공연"),
    ]),
    (30, "문화적 차이에 대한 반응은?", [
        ("A", "배울 점이 많다고 느낌"),
        ("B", "당황하지만 점차 적응"),
        ("C", "차이를 인정하며 거리 유지"),
        ("D", "불편함을 느끼고 피하고 싶음"),
    ]),
    // === 활동 및 체험 선호도 (31-42번) ===
    (31, "선호하는 신체 활동 강도는?", [
        ("A", "격렬한 스포츠와 모험"),
        ("B", "적당한 운동량의 활동"),
        ("C", "산책이나 가벼운 걷기"),
        ("D", "최소한의 움직임과 휴식"),
    ]),
    (32, "음식 체험에서 가장 중요하게 생각하는 것은?", [
        ("A", "현지 고유의 독특한 맛"),
        ("B", "신선하고 건강한 재료"),
        ("C", "익숙하고 입맛에 맞는 음식"),
        ("D", "시각적으로 아름다운 음식"),
    ]),
    (33, "새로운 음식에 대한 도전 의지는?", [
        ("A", "모든 음식을 시도해보고 싶음"),
        ("B", "추천받은 음식만 도전"),
        ("C", "익숙해 보이는 음식만"),
        ("D", "친숙한 음식 위주로"),
    ]),
    (34, "기념품 구매 시 선호는?", [
        ("A", "현지 특산품"),
        ("B", "실용적인 아이템"),
        ("C", "추억을 떠올리는 장식품"),
        ("D", "구매보다 경험 우선"),
    ]),
    (35, "여행 중 사진 촬영 스타일은?", [
        ("A", "모든 순간을 꼼꼼히 기록"),
        ("B", "특별한 순간만 촬영"),
        ("C", "예술적인 풍경 사진 위주"),
        ("D", "사진보다 직접 느끼는 것 우선"),
    ]),
    (36, "교통수단 선택 시 우선순위는?", [
        ("A", "빠르고 편리한 이동"),
        ("B", "경치를 즐기는 여유로운 이동"),
        ("C", "현지 문화를 느낄 수 있는 수단"),
        ("D", "독특하고 기억에 남는 이동"),
    ]),
    (37, "숙소 선택 시 가장 중요한 요소는?", [
        ("A", "깨끗하고 편안한 환경"),
        ("B", "현지 문화를 반영한 분위기"),
        ("C", "아름다운 풍경과 위치"),
        ("D", "독특한 컨셉의 숙소"),
    ]),
    (38, "여행 중 휴식 시간을 보내는 방식은?", [
        ("A", "숙소에서 완전히 휴식"),
        ("B", "카페에서 여유롭게 시간 보내기"),
        ("C", "주변을 산책하며 탐방"),
        ("D", "다음 일정 계획하며 준비"),
    ]),
    (39, "날씨가 좋지 않을 때의 대안 활동은?", [
        ("A", "박물관이나 실내 관광지 방문"),
        ("B", "카페나 레스토랑에서 여유"),
        ("C", "쇼핑몰이나 시장 탐방"),
        ("D", "숙소에서 휴식하며 대기"),
    ]),
    (40, "여행 중 건강 관리에 대한 태도는?", [
        ("A", "건강한 식단과 운동 유지"),
        ("B", "적당한 활동으로 컨디션 유지"),
        ("C", "여행 중엔 자유롭게 즐김"),
        ("D", "즐거움과 경험이 건강보다 우선"),
    ]),
    (41, "예상치 못한 상황에서의 대처 방식은?", [
        ("A", "침착하게 해결책 찾기"),
        ("B", "재미있는 에피소드로 받아들임"),
        ("C", "대안 계획 실행"),
        ("D", "현지인이나 전문가에게 도움 요청"),
    ]),
    (42, "여행에서 학습과 성장에 대한 기대는?", [
        ("A", "새로운 지식과 경험으로 성장"),
        ("B", "자연스럽게 배우면 좋지만 강요 NO"),
        ("C", "휴식이 우선, 학습은 부담"),
        ("D", "흥미로운 것만 선택적으로 학습"),
    ]),
    // === 라이프스타일 및 개인 성향 (43-50번) ===
    (43, "평소 휴일을 보내는 방식은?", [
        ("A", "집에서 휴식하며 재충전"),
        ("B", "가까운 곳으로 나들이"),
        ("C", "친구들과 활동적으로"),
        ("D", "새로운 장소 탐험"),
    ]),
    (44, "스트레스 해소에 가장 효과적인 방법은?", [
        ("A", "충분한 휴식과 수면"),
        ("B", "운동이나 신체 활동"),
        ("C", "친구와의 대화와 만남"),
        ("D", "취미나 새로운 도전"),
    ]),
    (45, "낯선 사람들과의 만남에 대한 태도는?", [
        ("A", "적극적으로 친해지기"),
        ("B", "상대가 먼저 다가오면 자연스럽게"),
        ("C", "필요 시 최소한의 대화"),
        ("D", "혼자 있는 시간 선호"),
    ]),
    (46, "새로운 환경에 대한 적응력은?", [
        ("A", "변화를 즐기며 빠르게 적응"),
        ("B", "조금 어색하지만 점차 적응"),
        ("C", "적응에 시간이 필요"),
        ("D", "익숙한 환경을 선호"),
    ]),
    (47, "위험하거나 모험적인 활동에 대한 태도는?", [
        ("A", "스릴을 즐기는 모험가"),
        ("B", "안전이 보장되면 도전"),
        ("C", "검증된 활동만 시도"),
        ("D", "안전한 활동만 선호"),
    ]),
    (48, "시간 관리와 계획에 대한 성향은?", [
        ("A", "철저한 계획과 준비"),
        ("B", "큰 틀만 계획, 세부는 유연히"),
        ("C", "최소한의 준비로 즉흥적"),
        ("D", "계획 자체를 싫어함"),
    ]),
    (49, "경험과 물질적 소유 중 어느 것을 더 중시하나요?", [
        ("A", "경험이 가장 소중한 자산"),
        ("B", "좋은 경험을 위해 투자 가능"),
        ("C", "경험과 실용성을 모두 고려"),
        ("D", "실질적 가치를 더 중시"),
    ]),
    (50, "여행을 통해 궁극적으로 얻고 싶은 것은?", [
        ("A", "스트레스 해소와 완전한 휴식"),
        ("B", "새로운 깨달음과 영감"),
        ("C", "평생 기억될 독특한 경험"),
        ("D", "소중한 사람들과의 추억"),
    ]),
];

fn build_question(raw: &RawQuestion) -> Question {
    Question {
        id: raw.0,
        text: raw.1.to_string(),
        options: raw
            .2
            .iter()
            .map(|(id, text)| QuizOption {
                id: (*id).to_string(),
                text: (*text).to_string(),
            })
            .collect(),
    }
}

/// The full 50-question bank in id order.
pub fn all_questions() -> Vec<Question> {
    QUESTION_BANK.iter().map(build_question).collect()
}

/// Stratified sample of `count` questions.
///
/// The count is distributed across the five categories (floor division, the
/// remainder landing on the earlier categories), so any request of five or
/// more questions draws from every category. Question order and each
/// question's option order are shuffled; question ids are never repeated.
pub fn sample_questions<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<Question> {
    let mut per_category = [count / CATEGORY_COUNT; CATEGORY_COUNT];
    for slot in per_category.iter_mut().take(count % CATEGORY_COUNT) {
        *slot += 1;
    }

    let mut selected: Vec<Question> = Vec::with_capacity(count);
    for (index, (start, end)) in CATEGORY_RANGES.iter().enumerate() {
        let mut pool: Vec<Question> = QUESTION_BANK
            .iter()
            .filter(|raw| raw.0 >= *start && raw.0 <= *end)
            .map(build_question)
            .collect();
        pool.shuffle(rng);
        selected.extend(pool.into_iter().take(per_category[index]));
    }

    selected.shuffle(rng);
    for question in &mut selected {
        question.options.shuffle(rng);
    }
    selected
}

/// Samples the default session subset with a thread-local RNG.
pub fn shuffled_questions() -> Vec<Question> {
    sample_questions(DEFAULT_QUESTION_COUNT, &mut rand::thread_rng())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn category_of(id: u32) -> usize {
        CATEGORY_RANGES
            .iter()
            .position(|(start, end)| id >= *start && id <= *end)
            .unwrap()
    }

    #[test]
    fn bank_holds_fifty_questions_with_four_options_each() {
        let bank = all_questions();
        assert_eq!(bank.len(), 50);
        for question in &bank {
            assert_eq!(question.options.len(), 4);
        }
    }

    #[test]
    fn sample_covers_every_category() {
        let mut rng = rand::thread_rng();
        for count in [5, 7, 10, 15] {
            let sample = sample_questions(count, &mut rng);
            assert_eq!(sample.len(), count);
            let categories: HashSet<usize> =
                sample.iter().map(|q| category_of(q.id)).collect();
            assert_eq!(categories.len(), CATEGORY_COUNT, "count {count}");
        }
    }

    #[test]
    fn sample_never_repeats_a_question_id() {
        let mut rng = rand::thread_rng();
        for _ in 0..20 {
            let sample = sample_questions(DEFAULT_QUESTION_COUNT, &mut rng);
            let ids: HashSet<u32> = sample.iter().map(|q| q.id).collect();
            assert_eq!(ids.len(), sample.len());
        }
    }

    #[test]
    fn shuffled_options_keep_unique_ids() {
        let mut rng = rand::thread_rng();
        let sample = sample_questions(DEFAULT_QUESTION_COUNT, &mut rng);
        for question in &sample {
            let option_ids: HashSet<&str> =
                question.options.iter().map(|o| o.id.as_str()).collect();
            assert_eq!(option_ids.len(), question.options.len());
        }
    }

    #[test]
    fn oversized_requests_are_capped_by_the_bank() {
        let mut rng = rand::thread_rng();
        let sample = sample_questions(500, &mut rng);
        // Each category can only contribute what it holds.
        assert_eq!(sample.len(), 50);
    }
}
