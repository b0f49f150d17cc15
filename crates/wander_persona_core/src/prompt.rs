//! crates/wander_persona_core/src/prompt.rs
//!
//! The structured request sent to the text-generation model and the shape
//! expected back. The destination prompt is the product's core contract:
//! domestic destinations only, real addressable venues, per-line budget and
//! transport formats, and an English image prompt for the second stage.

use crate::biorhythm::BiorhythmPercent;
use serde_json::{json, Value};

/// Sampling is fixed high to maximize answer diversity across repeated calls
/// with identical biorhythm but different quiz answers.
pub const TEMPERATURE: f64 = 1.3;
pub const TOP_P: f64 = 0.95;

/// Inputs interpolated into the destination prompt. `popularity` is a
/// placeholder slot (currently always empty) reserved for feeding aggregate
/// like counts back into generation.
#[derive(Debug, Clone)]
pub struct DestinationPromptInput {
    pub physical: f64,
    pub emotional: f64,
    pub intellectual: f64,
    pub perceptual: f64,
    pub quiz_answers: Vec<String>,
    pub popularity: String,
    pub location: String,
}

const DESTINATION_TEMPLATE: &str = r#"[퀴즈 문항 예시]
- "여행에서 가장 중요하게 생각하는 가치는?" → "완전한 휴식과 스트레스 해소"
- "이상적인 여행 기간은?" → "일주일 정도의 여유로운 여행"
- "가장 마음이 편안해지는 자연환경은?" → "파도 소리가 들리는 해변"
- "신체 활동 강도에 대한 선호는?" → "적당한 운동량의 가벼운 활동"
- "평소 휴일을 보내는 방식은?" → "집에서 푹 쉬며 재충전"

[지침]
- 반드시 대한민국 국내(한국) 여행지(도시, 지역, 명소)만 추천할 것. 해외 여행지는 절대 추천하지 말 것.
- 서울, 부산, 인천, 대구, 대전, 광주, 울산 등 대도시는 추천 대상에서 제외할 것.
- 반드시 한국관광공사에서 추천하는 주요 관광지(도시/지역/명소) 내에서만 추천할 것.
- destinationName(추천 여행지 이름)은 반드시 시/군/구 앞에 해당 도/광역시/특별시를 붙여서 예: '전라남도 담양', '경상북도 경주', '서울특별시 강남구'처럼 지역+도시 형태로 출력할 것. (예시: '담양'이 아니라 '전라남도 담양'으로)
- 퀴즈 답변의 조합에 따라 여행지 추천 결과가 다양하게 나오도록 할 것
- 퀴즈 답변을 주로 참고하되, 필요시 바이오리듬 등 다른 입력값도 참고할 것
- 추천지는 반드시 실제 존재하는 도시/국가명으로, 답변과 논리적으로 연결될 것

[중요] 아래 입력값(Physical, Emotional, Intellectual, Perceptual, Quiz Answers, Popularity, UserLocation 등) 모든 정보를 반드시 최대한 꼼꼼하게 참조하여, 각 항목(여행지, 분석, 추천 장소, 예산, 교통, 팁 등)을 논리적으로 생성할 것. 입력값을 무시하거나 임의로 결과를 생성하지 말고, 반드시 입력값을 근거로 결과를 도출할 것.

The following are the user's biorhythm values, travel tendencies (quiz answers), and the popularity of the recommended destination among all users. Based on this information, generate a recommended destination and the reason for the recommendation.

[Input]
- Physical: {physical}
- Emotional: {emotional}
- Intellectual: {intellectual}
- Perceptual: {perceptual}
- Quiz Answers: {quizAnswers}
- Popularity: {popularity}
- UserLocation: {location}
  (UserLocation은 사용자의 실제 출발 위치 정보입니다. 반드시 교통편 생성 시 출발지로 활용할 것)

[Output]
1. personaTitle: (반드시 한글 2단어 조합, 예: "감성 힐링가", "모험 탐험가" 등. 10자 이내, 이모지 금지)
2. destinationName: (반드시 퀴즈 답변만을 근거로 사용자의 여행 성향에 가장 적합한 실제 존재하는 도시 또는 국가명을 한글로 추천할 것. 바이오리듬 수치는 참고하지 말 것. 단순히 임의로 정하지 말고, 입력된 퀴즈 답변에 논리적으로 어울리는 여행지를 선정할 것. 영어, 번역, 괄호, 설명문, 이모지 등은 절대 포함하지 말 것. 반드시 시/군/구 앞에 해당 도/광역시/특별시를 붙여서 예: '전라남도 담양', '경상북도 경주', '서울특별시 강남구'처럼 지역+도시 형태로 출력할 것. (예시: '담양'이 아니라 '전라남도 담양'으로))
3. analysis: 반드시 추천 지역(destinationName)의 상세설명(특징, 분위기, 매력 등)만 5~6문장으로 구체적이고 풍부하게 작성할 것. 바이오리듬, 퀴즈 답변, 수치, 영어, 기호, 추천 이유 등은 포함하지 말고, 해당 지역의 자연, 명소, 분위기, 계절감, 음식, 문화, 여행 매력 등만 자연스러운 한글로 설명할 것.
4. recommendations: 반드시 destinationName(추천된 도시/국가) 내에 실제로 존재하는 숙소 1곳, 맛집 1곳, 명소 1곳만 추천할 것. 총 3개만 포함할 것. 다른 지역의 장소, 가상의 장소, 번역된 이름, 설명문, 이모지 등은 절대 포함하지 말 것. For each of accommodation, restaurant, and attraction within destinationName, set name as follows:
   - If the place is in Korea, use only the official Korean name (no English, no translation, no parentheses).
   - If the place is outside Korea, use only the official English name (no Korean, no translation, no parentheses).
   - Do not mix languages, do not use both Korean and English, do not use parentheses or slashes, and do not translate.
   - Example: "호텔 사보이" (for Korea), "Hotel Savoy" (for outside Korea)
   Each item should include type (one of '숙소', '맛집', '명소'), name, description (Korean, within 30 characters), address (actual address, within 50 characters), and preferenceScore (a float between 0 and 1, where higher means more strongly recommended for the user. Example: 0.92).
5. budget: 반드시 destinationName(추천된 도시/국가) 기준의 실제 물가와 여행 경비를 현실적으로 반영해서 작성할 것. 각 항목(숙박, 식비, 액티비티, 교통비, 기타 등)은 한 줄씩 줄바꿈해서 작성.
모든 금액은 반드시 '원' 단위(예: 50,000원)로만 표기하고, 외화(엔, 달러, 유로 등)는 절대 사용하지 말 것.
각 항목별 금액은 현실적인 범위(예: 숙박 80,000~300,000원, 식비 20,000~100,000원, 액티비티 10,000~100,000원 등)에서 랜덤하게 생성하고,
항목별로 금액이 너무 비슷하지 않게 충분한 차이를 두어 다양하게 표기할 것.
기타 항목은 반드시 '기념품, 소소한 간식, 현지 교통비 등 실제 여행에서 발생할 수 있는 추가 비용'만 포함할 것. 기타 항목에 불필요한 설명, 이상한 항목, 설명문, AI 안내문 등은 절대 넣지 말 것. 예시: 기타: 10,000원 (예: 기념품, 간식, 현지 교통비 등)
마지막 줄에 '총 1박 기준: 총액(원)' 형태로 합산 금액을 표기할 것.
6. transport: 반드시 UserLocation(입력된 위치)에서 destinationName(추천 여행지)까지 실제 이동 경로, 교통수단, 소요시간, 가격을 현실적으로 안내할 것. 임의의 출발지(서울, 김포 등)는 절대 사용하지 말 것. 반드시 한국어로, '비행', '시내' 각각 한 줄씩 줄바꿈해서 작성.
7. tip: 반드시 destinationName(추천된 도시/국가)에서 실제로 유용한 여행 팁만 포함할 것. 반드시 한국어로, 각 항목별로 줄바꿈해서 3–4가지 이상, 각 팁은 20–50자 이내의 구체적이고 실질적인 문장으로 안내. 예시: '자외선이 강하니 SPF50 이상의 선크림을 꼭 챙기세요.'
8. imagePrompt: In English, provide a highly artistic, emotional, and visually stunning photo of the recommended destination, as if taken by a professional local photographer. The image should be high-resolution, realistic, and capture the unique atmosphere and beauty of the place. Avoid illustrations or cartoons. Use a cinematic, travel magazine style. No people, no text, no watermark, no logo, no cartoon, no illustration, no drawing, no painting, no animation, no emoji.
+ 반드시 사진작가가 직접 촬영한 것처럼 아름답고 현실적인 명소 사진이어야 하며, 해당 지역의 대표적 장소가 뚜렷하게 드러나야 함.
+ 모든 설명, 분석, 추천 결과(analysis, recommendations.description 등)는 반드시 한국어로 작성할 것. 영어로 작성하지 말 것. 영어가 포함되면 반드시 한국어로만 다시 작성할 것.
+ 반드시 실제 존재하는 명소, 거리, 건물, 랜드마크 등 구체적 장소가 포함되어야 하며, 사람들이 실제로 가보고 싶다고 느낄만한 현실적인 장소로 묘사할 것. 자연 풍경만 묘사하지 말고, 구체적 위치(예: 에펠탑, 도쿄 시부야 거리, 뉴욕 타임스퀘어 등)가 반드시 드러나야 함.
9. popularity: 반드시 Tripadvisor, Expedia, Booking.com 등 주요 여행 플랫폼의 실제 평점, 리뷰 수, 방문자 수 등 일반 사용자 데이터를 조합해 총점(선호도)을 현실적으로 작성할 것. 예: 'Tripadvisor 4.7/5, Expedia 4.5/5, Booking.com 9.1/10, 리뷰 총 3,200개, 방문자 수 기준 인기 지역' 등. 임의의 수치나 설명, AI 안내문 등은 넣지 말 것.

Return in the JSON format as shown below."#;

/// Renders the destination prompt with the session's inputs interpolated.
pub fn destination_prompt(input: &DestinationPromptInput) -> String {
    DESTINATION_TEMPLATE
        .replace("{physical}", &format_score(input.physical))
        .replace("{emotional}", &format_score(input.emotional))
        .replace("{intellectual}", &format_score(input.intellectual))
        .replace("{perceptual}", &format_score(input.perceptual))
        .replace("{quizAnswers}", &input.quiz_answers.join(", "))
        .replace("{popularity}", &input.popularity)
        .replace("{location}", &input.location)
}

fn format_score(score: f64) -> String {
    format!("{score:.4}")
}

/// The structured-output schema the text model must satisfy, in the
/// generateContent `responseSchema` dialect.
pub fn destination_response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "personaTitle": { "type": "STRING" },
            "destinationName": { "type": "STRING" },
            "analysis": { "type": "STRING" },
            "recommendations": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "type": { "type": "STRING", "enum": ["숙소", "맛집", "명소"] },
                        "name": { "type": "STRING" },
                        "description": { "type": "STRING" },
                        "address": { "type": "STRING" },
                        "preferenceScore": { "type": "NUMBER" }
                    },
                    "required": ["type", "name", "address"]
                }
            },
            "budget": { "type": "STRING" },
            "transport": { "type": "STRING" },
            "tip": { "type": "STRING" },
            "imagePrompt": { "type": "STRING" },
            "popularity": { "type": "STRING" }
        },
        "required": [
            "personaTitle",
            "destinationName",
            "analysis",
            "recommendations",
            "transport",
            "tip",
            "imagePrompt",
            "popularity"
        ]
    })
}

/// The 2–3 sentence daily-condition interpretation prompt.
pub fn interpretation_prompt(percent: &BiorhythmPercent) -> String {
    format!(
        "\n아래 바이오리듬 수치를 참고해서 오늘의 여행 컨디션을 한글로 2~3문장으로 해석해줘.\n\n신체: {}, 감정: {}, 지성: {}\n",
        percent.physical, percent.emotional, percent.intellectual
    )
}

/// The ≤20-character short-form variant of the same interpretation.
pub fn short_interpretation_prompt(percent: &BiorhythmPercent) -> String {
    format!(
        "\n아래 바이오리듬 수치를 참고해서 오늘의 여행 컨디션을 한글로 20자 이내로 아주 짧게 요약해줘.\n\n신체: {}, 감정: {}, 지성: {}\n",
        percent.physical, percent.emotional, percent.intellectual
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_input() -> DestinationPromptInput {
        DestinationPromptInput {
            physical: 0.5215,
            emotional: -0.31,
            intellectual: 0.98,
            perceptual: 0.0,
            quiz_answers: vec![
                "완전한 휴식과 스트레스 해소".into(),
                "파도 소리가 들리는 해변".into(),
            ],
            popularity: String::new(),
            location: "전라남도 - 순천시".into(),
        }
    }

    #[test]
    fn prompt_interpolates_every_input_slot() {
        let rendered = destination_prompt(&sample_input());

        assert!(rendered.contains("- Physical: 0.5215"));
        assert!(rendered.contains("- Emotional: -0.3100"));
        assert!(rendered.contains("- Intellectual: 0.9800"));
        assert!(rendered.contains("- Perceptual: 0.0000"));
        assert!(rendered.contains("완전한 휴식과 스트레스 해소, 파도 소리가 들리는 해변"));
        assert!(rendered.contains("- UserLocation: 전라남도 - 순천시"));
        assert!(!rendered.contains("{physical}"));
        assert!(!rendered.contains("{location}"));
    }

    #[test]
    fn schema_requires_the_core_output_fields() {
        let schema = destination_response_schema();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();

        for field in ["personaTitle", "destinationName", "recommendations", "imagePrompt"] {
            assert!(required.contains(&field), "missing {field}");
        }
        assert_eq!(
            schema["properties"]["recommendations"]["items"]["properties"]["type"]["enum"],
            json!(["숙소", "맛집", "명소"])
        );
    }

    #[test]
    fn interpretation_prompts_carry_the_percentages() {
        let percent = BiorhythmPercent {
            physical: 52,
            emotional: -31,
            intellectual: 98,
        };
        let long = interpretation_prompt(&percent);
        let short = short_interpretation_prompt(&percent);

        assert!(long.contains("신체: 52, 감정: -31, 지성: 98"));
        assert!(short.contains("20자 이내"));
        assert!(short.contains("신체: 52"));
    }
}
