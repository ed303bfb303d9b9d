//! Interpretation tables: descriptive phrase pools, cross-trait combination
//! rules, and relationship / career sentences.

use crate::traits::Trait::{self, *};
use crate::traits::TraitLevel::{self, *};

/// Phrases per trait × level cell.
pub const POOL_SIZE: usize = 5;

pub fn phrases(t: Trait, level: TraitLevel) -> &'static [&'static str; POOL_SIZE] {
    match (t, level) {
        (Extraversion, Low) => &[
            "tends to be quiet and reserved in social settings",
            "draws energy from solitude and deep one-on-one connections",
            "values their personal space and time for introspection",
            "prefers smaller, intimate gatherings to large social events",
            "thinks carefully before speaking and values meaningful conversation",
        ],
        (Extraversion, Medium) => &[
            "balances social time with personal space effectively",
            "can engage socially when needed but also values alone time",
            "adapts their social energy depending on the situation",
            "enjoys both group activities and solitary pursuits",
            "can lead when necessary but doesn't always seek the spotlight",
        ],
        (Extraversion, High) => &[
            "thrives in social situations and enjoys meeting new people",
            "is energetic and enthusiastic in their interactions",
            "seeks out excitement and stimulating environments",
            "communicates expressively and shares thoughts readily",
            "naturally takes charge in group settings",
        ],
        (Neuroticism, Low) => &[
            "maintains emotional stability even under pressure",
            "approaches challenges with a calm and steady mindset",
            "recovers quickly from setbacks and disappointments",
            "tends to stay optimistic in difficult situations",
            "rarely becomes overwhelmed by stress or anxiety",
        ],
        (Neuroticism, Medium) => &[
            "experiences a normal range of emotional ups and downs",
            "generally handles stress well but may occasionally feel overwhelmed",
            "is reasonably resilient while still being emotionally responsive",
            "can usually manage anxiety though sometimes needs time to process",
            "balances realistic concerns with positive outlook",
        ],
        (Neuroticism, High) => &[
            "experiences emotions intensely and may worry frequently",
            "is highly sensitive to stress and environmental changes",
            "tends to analyze situations deeply, sometimes leading to overthinking",
            "may struggle with anxiety when facing uncertain situations",
            "feels emotions deeply and processes experiences thoroughly",
        ],
        (Agreeableness, Low) => &[
            "prioritizes logical thinking over emotional considerations",
            "isn't afraid to challenge others' opinions when necessary",
            "values honesty and directness in communication",
            "approaches decisions with analytical reasoning",
            "maintains strong boundaries and stands firm in their positions",
        ],
        (Agreeableness, Medium) => &[
            "balances cooperation with standing up for their own needs",
            "can be diplomatic while still expressing honest opinions",
            "shows compassion while maintaining healthy boundaries",
            "considers others' feelings without sacrificing their own priorities",
            "cooperates well but can be assertive when values are compromised",
        ],
        (Agreeableness, High) => &[
            "genuinely cares about others' wellbeing and happiness",
            "approaches conflicts with empathy and understanding",
            "readily offers help and support to those in need",
            "values harmony and cooperation in relationships",
            "shows compassion and consideration in their interactions",
        ],
        (Conscientiousness, Low) => &[
            "takes a flexible and spontaneous approach to life",
            "adapts quickly to changing circumstances",
            "prefers to keep options open rather than make rigid plans",
            "tackles tasks with creative, outside-the-box thinking",
            "values freedom and resists excessive structure",
        ],
        (Conscientiousness, Medium) => &[
            "maintains a balance between organization and flexibility",
            "can follow plans while adapting to unexpected changes",
            "is reasonably reliable while avoiding excessive rigidity",
            "sets goals but remains open to adjusting priorities",
            "appreciates both spontaneity and structure in appropriate contexts",
        ],
        (Conscientiousness, High) => &[
            "approaches tasks with careful planning and organization",
            "demonstrates strong self-discipline and work ethic",
            "pays close attention to details and quality",
            "follows through on commitments reliably",
            "sets clear goals and works persistently to achieve them",
        ],
        (Openness, Low) => &[
            "values practical thinking and concrete solutions",
            "appreciates tradition and time-tested approaches",
            "prefers familiar routines and established methods",
            "focuses on tangible realities rather than abstract concepts",
            "takes a pragmatic approach to life's challenges",
        ],
        (Openness, Medium) => &[
            "balances traditional approaches with occasional new ideas",
            "appreciates both practical solutions and creative thinking",
            "explores new concepts while maintaining some familiar routines",
            "shows moderate curiosity about different perspectives",
            "can appreciate both abstract and concrete thinking",
        ],
        (Openness, High) => &[
            "shows deep curiosity and interest in novel experiences",
            "thinks creatively and appreciates abstract ideas",
            "actively seeks out different perspectives and worldviews",
            "enjoys exploring complex questions and philosophical discussions",
            "embraces change and values innovation",
        ],
    }
}

/// Insight emitted when every `(trait, level)` condition holds.
#[derive(Debug, Clone, Copy)]
pub struct CombinationRule {
    pub conditions: &'static [(Trait, TraitLevel)],
    pub insight: &'static str,
}

/// Evaluated in declaration order; the first matches win.
pub const COMBINATION_RULES: &[CombinationRule] = &[
    CombinationRule {
        conditions: &[(Extraversion, High), (Openness, High)],
        insight: "thrives on novelty and social exploration, likely seeking out unique experiences to share with others",
    },
    CombinationRule {
        conditions: &[(Extraversion, High), (Conscientiousness, High)],
        insight: "combines social leadership with reliable follow-through, making them effective in organizing group activities",
    },
    CombinationRule {
        conditions: &[(Extraversion, High), (Agreeableness, High)],
        insight: "creates warm social connections easily and helps maintain group harmony",
    },
    CombinationRule {
        conditions: &[(Extraversion, High), (Neuroticism, Low)],
        insight: "brings confident energy to social situations and maintains optimism under pressure",
    },
    CombinationRule {
        conditions: &[(Extraversion, Low), (Openness, High)],
        insight: "may prefer exploring ideas through reading, art, or deep one-on-one conversations rather than group activities",
    },
    CombinationRule {
        conditions: &[(Extraversion, Low), (Conscientiousness, High)],
        insight: "works effectively on independent projects requiring focus and attention to detail",
    },
    CombinationRule {
        conditions: &[(Openness, High), (Conscientiousness, High)],
        insight: "channels creativity through structured approaches, likely setting and achieving innovative goals",
    },
    CombinationRule {
        conditions: &[(Openness, High), (Agreeableness, Low)],
        insight: "may challenge conventional thinking directly, valuing intellectual honesty over social harmony",
    },
    CombinationRule {
        conditions: &[(Conscientiousness, High), (Neuroticism, High)],
        insight: "may set high personal standards and feel stress when unable to meet them perfectly",
    },
    CombinationRule {
        conditions: &[(Conscientiousness, High), (Agreeableness, High)],
        insight: "reliably follows through on commitments to others, making them a dependable friend and colleague",
    },
    CombinationRule {
        conditions: &[(Agreeableness, High), (Neuroticism, High)],
        insight: "deeply cares about relationships and may worry about others' perceptions and needs",
    },
    CombinationRule {
        conditions: &[(Conscientiousness, Low), (Openness, High)],
        insight: "approaches life with spontaneous creativity, preferring exploration over rigid planning",
    },
    CombinationRule {
        conditions: &[(Extraversion, High), (Openness, High), (Conscientiousness, Low)],
        insight: "seeks out novel social experiences and adventures, preferring spontaneity over detailed planning",
    },
    CombinationRule {
        conditions: &[(Agreeableness, High), (Conscientiousness, High), (Neuroticism, Low)],
        insight: "creates stable, harmonious environments through reliable action and emotional steadiness",
    },
    CombinationRule {
        conditions: &[(Extraversion, Low), (Openness, Low), (Conscientiousness, High)],
        insight: "works diligently within established systems, valuing reliability and tradition",
    },
];

/// Relationship sentence for a non-medium level.
pub fn relationship_insight(t: Trait, level: TraitLevel) -> Option<&'static str> {
    let text = match (t, level) {
        (_, Medium) => return None,
        (Extraversion, High) => "seeks active social connections and shared activities in relationships",
        (Extraversion, Low) => "values deep, meaningful connections with a smaller circle of close relationships",
        (Neuroticism, High) => "appreciates partners who provide emotional support and understanding",
        (Neuroticism, Low) => "brings stability and calm to relationships, especially during challenges",
        (Agreeableness, High) => "prioritizes harmony and tends to be accommodating in relationships",
        (Agreeableness, Low) => "values straightforward communication and honest exchanges",
        (Conscientiousness, High) => "is reliable and committed in relationships, following through on promises",
        (Conscientiousness, Low) => "brings spontaneity and flexibility to relationships",
        (Openness, High) => "enjoys exploring new experiences and intellectual discussions with partners",
        (Openness, Low) => "provides stability and appreciates established routines in relationships",
    };
    Some(text)
}

/// Career sentence for a non-medium level.
pub fn career_insight(t: Trait, level: TraitLevel) -> Option<&'static str> {
    let text = match (t, level) {
        (_, Medium) => return None,
        (Extraversion, High) => "may thrive in roles involving teamwork, leadership, or customer interaction",
        (Extraversion, Low) => "often excels in positions requiring concentration, deep focus, or independent work",
        (Neuroticism, High) => "may perform well in detail-oriented roles where thoroughness is valued",
        (Neuroticism, Low) => "typically handles high-pressure situations effectively and adapts to change",
        (Agreeableness, High) => "often finds fulfillment in helping professions or collaborative environments",
        (Agreeableness, Low) => "may excel in roles requiring critical analysis, negotiation, or competition",
        (Conscientiousness, High) => "tends to perform well in structured environments requiring reliability and organization",
        (Conscientiousness, Low) => "may thrive in dynamic settings requiring adaptability and quick responses",
        (Openness, High) => "often enjoys creative fields, research, or positions involving innovation",
        (Openness, Low) => "may excel in practical fields where consistency and concrete thinking are valued",
    };
    Some(text)
}
