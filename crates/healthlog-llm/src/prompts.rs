//! Instruction payloads for the three record domains.
//!
//! Each payload states the JSON shape the parser accepts, the rules for
//! deciding whether the message is a record at all, and worked examples
//! including messages that carry several entities.

use healthlog_core::Domain;

const WEIGHT_INSTRUCTIONS: &str = r#"次のメッセージが体重の記録かどうかを判定し、JSONオブジェクトを1つだけ返してください。説明文は不要です。

{
  "isWeightRecord": boolean,
  "weight": number | null,
  "hasBodyFat": boolean,
  "bodyFat": number | null,
  "confidence": number
}

ルール:
- 数値と体重の単位（kg、キロ、キログラム）、または「体重」という語があれば記録とみなす
- 体脂肪率は「体脂肪」「体脂肪率」と%付きの数値がある場合のみ hasBodyFat: true
- 書かれていない値は推測せず null にする
- 質問や相談（？で終わるもの、「どうやって」「何キロがいい」など）は isWeightRecord: false
- confidence は 0 から 1 の数値

例:
- 「65kg」→ {"isWeightRecord": true, "weight": 65, "hasBodyFat": false, "bodyFat": null, "confidence": 0.9}
- 「体重64.5キロ」→ {"isWeightRecord": true, "weight": 64.5, "hasBodyFat": false, "bodyFat": null, "confidence": 0.9}
- 「今朝の体重63kg 体脂肪17%」→ {"isWeightRecord": true, "weight": 63, "hasBodyFat": true, "bodyFat": 17, "confidence": 0.95}
- 「体重どうやって減らす？」→ {"isWeightRecord": false, "weight": null, "hasBodyFat": false, "bodyFat": null, "confidence": 0.9}
"#;

const FOOD_INSTRUCTIONS: &str = r#"次のメッセージが食事の記録かどうかを判定し、JSONオブジェクトを1つだけ返してください。説明文は不要です。

{
  "isFoodRecord": boolean,
  "isDefiniteRecord": boolean,
  "hasSpecificMealTime": boolean,
  "mealTime": "breakfast" | "lunch" | "dinner" | "snack" | null,
  "isMultipleMealTimes": boolean,
  "mealTimes": [{"mealTime": string, "foodText": string}],
  "foodText": string,
  "confidence": number
}

ルール:
- 食べ物の名前があれば記録候補。「食べた」「飲んだ」「記録して」や食事時間の指定があれば isDefiniteRecord: true
- 「美味しかった」だけのような曖昧な表現は isDefiniteRecord: false
- foodText には分量を含めた食事部分をユーザーの表記のまま入れる。言い換えや補足はしない
- 食事時間: 朝・朝食・朝ごはん → breakfast、昼・昼食・ランチ → lunch、夜・夕食・晩ごはん → dinner、間食・おやつ → snack
- 1つのメッセージに2つ以上の食事時間がある場合は必ず isMultipleMealTimes: true にし、mealTimes に出てきた順で入れる
- 「、」「と」で並んだ食べ物は同じ食事時間の foodText にまとめる
- 質問や相談（「〜はダイエットに良い？」「カロリーは？」など）は isFoodRecord: false

例:
- 「唐揚げ食べた記録して」→ {"isFoodRecord": true, "isDefiniteRecord": true, "hasSpecificMealTime": false, "mealTime": null, "isMultipleMealTimes": false, "mealTimes": [], "foodText": "唐揚げ", "confidence": 0.9}
- 「ご飯100gと納豆」→ {"isFoodRecord": true, "isDefiniteRecord": true, "hasSpecificMealTime": false, "mealTime": null, "isMultipleMealTimes": false, "mealTimes": [], "foodText": "ご飯100gと納豆", "confidence": 0.85}
- 「昼 ラーメン」→ {"isFoodRecord": true, "isDefiniteRecord": true, "hasSpecificMealTime": true, "mealTime": "lunch", "isMultipleMealTimes": false, "mealTimes": [], "foodText": "ラーメン", "confidence": 0.9}
- 「朝にパンとコーヒー 昼にカツ丼 夜に納豆」→ {"isFoodRecord": true, "isDefiniteRecord": true, "hasSpecificMealTime": true, "mealTime": null, "isMultipleMealTimes": true, "mealTimes": [{"mealTime": "breakfast", "foodText": "パンとコーヒー"}, {"mealTime": "lunch", "foodText": "カツ丼"}, {"mealTime": "dinner", "foodText": "納豆"}], "foodText": "", "confidence": 0.9}
- 「昼食でハンバーガー 間食でケーキ記録して」→ {"isFoodRecord": true, "isDefiniteRecord": true, "hasSpecificMealTime": true, "mealTime": null, "isMultipleMealTimes": true, "mealTimes": [{"mealTime": "lunch", "foodText": "ハンバーガー"}, {"mealTime": "snack", "foodText": "ケーキ"}], "foodText": "", "confidence": 0.9}
- 「ラーメンのカロリーは？」→ {"isFoodRecord": false, "isDefiniteRecord": false, "hasSpecificMealTime": false, "mealTime": null, "isMultipleMealTimes": false, "mealTimes": [], "foodText": "", "confidence": 0.9}
"#;

const EXERCISE_INSTRUCTIONS: &str = r#"次のメッセージが運動の記録かどうかを判定し、JSONオブジェクトを1つだけ返してください。説明文は不要です。

運動が1つの場合:
{
  "isExerciseRecord": boolean,
  "isMultipleExercises": false,
  "exerciseType": "cardio" | "strength" | "flexibility" | "sports" | "water" | "winter" | "martial_arts" | "dance" | "daily",
  "exerciseName": string,
  "duration": number | null,
  "intensity": "low" | "moderate" | "high" | null,
  "sets": number | null,
  "reps": number | null,
  "weight": number | null,
  "distance": number | null,
  "timeOfDay": "morning" | "afternoon" | "evening" | "night" | null,
  "weightSets": [{"weight": number, "reps": number, "sets": number}],
  "calories": number | null,
  "confidence": number
}

運動が2つ以上の場合:
{
  "isExerciseRecord": true,
  "isMultipleExercises": true,
  "exercises": [ 上と同じ形のオブジェクトを出てきた順に ],
  "confidence": number
}

ルール:
- duration は分、distance は km、weight は kg
- 書かれていない数値は推測せず null にする。0 を入れない
- 略称は正式名にする（腕立て → 腕立て伏せ、腹筋 → 腹筋運動、筋トレ → 筋力トレーニング）
- 「、」「と」や複数の運動名で区切られていれば isMultipleExercises: true
- calories はユーザーが消費カロリーを書いた場合のみ入れる
- 質問や相談（「何分走ればいい？」など）は isExerciseRecord: false

例:
- 「ランニング30分」→ {"isExerciseRecord": true, "isMultipleExercises": false, "exerciseType": "cardio", "exerciseName": "ランニング", "duration": 30, "intensity": null, "sets": null, "reps": null, "weight": null, "distance": null, "timeOfDay": null, "weightSets": [], "calories": null, "confidence": 0.9}
- 「ベンチプレス80kg 10回 3セット」→ {"isExerciseRecord": true, "isMultipleExercises": false, "exerciseType": "strength", "exerciseName": "ベンチプレス", "duration": null, "intensity": null, "sets": 3, "reps": 10, "weight": 80, "distance": null, "timeOfDay": null, "weightSets": [{"weight": 80, "reps": 10, "sets": 3}], "calories": null, "confidence": 0.9}
- 「朝5キロ走った」→ {"isExerciseRecord": true, "isMultipleExercises": false, "exerciseType": "cardio", "exerciseName": "ランニング", "duration": null, "intensity": null, "sets": null, "reps": null, "weight": null, "distance": 5, "timeOfDay": "morning", "weightSets": [], "calories": null, "confidence": 0.9}
- 「ヨガ30分とスクワット20回」→ {"isExerciseRecord": true, "isMultipleExercises": true, "exercises": [{"exerciseType": "flexibility", "exerciseName": "ヨガ", "duration": 30, "reps": null}, {"exerciseType": "strength", "exerciseName": "スクワット", "duration": null, "reps": 20}], "confidence": 0.9}
"#;

fn instructions(domain: Domain) -> &'static str {
    match domain {
        Domain::Weight => WEIGHT_INSTRUCTIONS,
        Domain::Food => FOOD_INSTRUCTIONS,
        Domain::Exercise => EXERCISE_INSTRUCTIONS,
    }
}

/// Full instruction string for one message.
pub fn build_prompt(domain: Domain, text: &str) -> String {
    format!("{}\nメッセージ:「{}」\n", instructions(domain), text.trim())
}
