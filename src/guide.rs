//! Static educational catalogue served by the guide endpoint. Content is
//! user-facing Brazilian Portuguese; no model call is involved.

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ScamPattern {
    pub title: &'static str,
    pub summary: &'static str,
    pub warning_signs: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct GuideContent {
    pub patterns: Vec<ScamPattern>,
    pub action_plan: Vec<&'static str>,
    pub shopping_checklist: Vec<&'static str>,
}

pub fn guide_content() -> GuideContent {
    GuideContent {
        patterns: vec![
            ScamPattern {
                title: "Phishing e Smishing",
                summary: "Golpistas enviam e-mails ou SMS falsos se passando por empresas \
                          famosas para 'pescar' seus dados.",
                warning_signs: "Senso de urgência, erros de português, links suspeitos.",
            },
            ScamPattern {
                title: "Golpe do WhatsApp",
                summary: "Criminosos clonam sua conta ou criam um perfil falso com sua foto \
                          para pedir dinheiro aos seus contatos.",
                warning_signs: "Sempre ligue para a pessoa (em chamada normal) para confirmar \
                                qualquer pedido de dinheiro.",
            },
            ScamPattern {
                title: "Lojas e Ofertas Fantasma",
                summary: "Sites falsos anunciam produtos por preços muito baixos para roubar \
                          seu dinheiro e seus dados.",
                warning_signs: "Preços bons demais para ser verdade, aceita apenas Pix para \
                                pessoa física.",
            },
            ScamPattern {
                title: "Falsos Investimentos",
                summary: "Um falso consultor promete lucros altíssimos, rápidos e sem risco.",
                warning_signs: "Promessas de lucro milagroso e pressão para decidir rápido.",
            },
            ScamPattern {
                title: "Golpes com IA",
                summary: "Uso de IA para criar vídeos (deepfakes) ou clonar vozes para aplicar \
                          golpes de forma mais realista.",
                warning_signs: "Crie uma 'palavra de segurança' com familiares para usar em \
                                emergências.",
            },
        ],
        action_plan: vec![
            "Contate o banco: ligue imediatamente para a central oficial do seu banco para \
             bloquear cartões e contas.",
            "Altere suas senhas: mude a senha do seu e-mail principal primeiro, depois das \
             outras contas.",
            "Faça um boletim de ocorrência online na delegacia virtual do seu estado.",
            "Tente recuperar o dinheiro: se o golpe foi via Pix, peça ao seu banco para \
             acionar o Mecanismo Especial de Devolução (MED).",
        ],
        shopping_checklist: vec![
            "O site começa com https:// e tem um cadeado?",
            "Os preços não são bons demais para ser verdade?",
            "O site tem informações claras como CNPJ e endereço?",
            "A reputação no Reclame Aqui é boa?",
            "A loja oferece pagamentos seguros como cartão de crédito?",
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guide_covers_all_patterns() {
        let guide = guide_content();
        assert_eq!(guide.patterns.len(), 5);
        assert_eq!(guide.action_plan.len(), 4);
        assert_eq!(guide.shopping_checklist.len(), 5);
    }

    #[test]
    fn test_guide_serializes() {
        let value = serde_json::to_value(guide_content()).unwrap();
        assert_eq!(value["patterns"][0]["title"], "Phishing e Smishing");
        assert!(value["action_plan"][0].as_str().unwrap().contains("banco"));
    }
}
